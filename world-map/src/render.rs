use ratatui::{buffer::Buffer, layout::Rect, style::Color, Frame};

use crate::core::{MapRead, RegionId};
use crate::highlight::HighlightSet;
use crate::view::ViewTransform;

const BORDER_RIGHT: char = '▕';
const BORDER_BELOW: char = '▁';

/// Colors for the choropleth. Highlighted regions take the accent color,
/// every other land region takes the neutral fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapTheme {
    pub water: Color,
    pub water_texture: Color,
    pub land: Color,
    pub land_hover: Color,
    pub highlight: Color,
    pub highlight_hover: Color,
    pub border: Color,
    pub water_density: u8,
}

impl MapTheme {
    pub fn builder() -> MapThemeBuilder {
        MapThemeBuilder::default()
    }

    pub fn fill(&self, lit: bool, hovered: bool) -> Color {
        match (lit, hovered) {
            (true, false) => self.highlight,
            (true, true) => self.highlight_hover,
            (false, false) => self.land,
            (false, true) => self.land_hover,
        }
    }
}

impl Default for MapTheme {
    fn default() -> Self {
        let water = Color::Rgb(22, 24, 30);
        Self {
            water,
            water_texture: adjust_color(water, 18),
            land: Color::Rgb(0xE8, 0xE8, 0xE8),
            land_hover: Color::Rgb(0xD0, 0xD0, 0xD0),
            highlight: Color::Rgb(0xE5, 0x09, 0x14),
            highlight_hover: Color::Rgb(0xB8, 0x07, 0x10),
            border: Color::Rgb(0xFF, 0xFF, 0xFF),
            water_density: 9,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapThemeBuilder {
    theme: MapTheme,
}

impl MapThemeBuilder {
    pub fn water(mut self, color: Color) -> Self {
        self.theme.water = color;
        self.theme.water_texture = adjust_color(color, 18);
        self
    }

    pub fn land(mut self, base: Color, hover: Color) -> Self {
        self.theme.land = base;
        self.theme.land_hover = hover;
        self
    }

    pub fn highlight(mut self, base: Color, hover: Color) -> Self {
        self.theme.highlight = base;
        self.theme.highlight_hover = hover;
        self
    }

    pub fn border(mut self, color: Color) -> Self {
        self.theme.border = color;
        self
    }

    pub fn water_density(mut self, density: u8) -> Self {
        self.theme.water_density = density;
        self
    }

    pub fn build(self) -> MapTheme {
        self.theme
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RenderConfig {
    /// Screen columns per screen row for one map cell.
    pub cell_aspect: f32,
    pub borders: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_aspect: 1.0,
            borders: true,
        }
    }
}

/// Geometry of the last render, used to map pointer positions back to cells.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MapRenderResult {
    pub area: Rect,
    pub map_width: u16,
    pub map_height: u16,
    pub center_x: f32,
    pub center_y: f32,
    pub cols_per_cell: f32,
    pub rows_per_cell: f32,
}

impl MapRenderResult {
    pub fn is_empty(&self) -> bool {
        self.area.width == 0
            || self.area.height == 0
            || self.cols_per_cell <= 0.0
            || self.rows_per_cell <= 0.0
    }

    fn map_point(&self, col: u16, row: u16) -> (f32, f32) {
        let sx = col as f32 + 0.5 - self.area.x as f32 - self.area.width as f32 / 2.0;
        let sy = row as f32 + 0.5 - self.area.y as f32 - self.area.height as f32 / 2.0;
        (
            self.center_x + sx / self.cols_per_cell,
            self.center_y + sy / self.rows_per_cell,
        )
    }

    /// Map cell under an absolute screen position.
    pub fn map_cell_at(&self, col: u16, row: u16) -> Option<(u16, u16)> {
        if self.is_empty() {
            return None;
        }
        let inside = col >= self.area.x
            && row >= self.area.y
            && col < self.area.x + self.area.width
            && row < self.area.y + self.area.height;
        if !inside {
            return None;
        }

        let (mx, my) = self.map_point(col, row);
        if mx < 0.0 || my < 0.0 || mx >= self.map_width as f32 || my >= self.map_height as f32 {
            return None;
        }
        Some((mx.floor() as u16, my.floor() as u16))
    }

    /// Screen position of a map cell's center, if it is visible.
    pub fn screen_cell_of(&self, map_x: u16, map_y: u16) -> Option<(u16, u16)> {
        if self.is_empty() {
            return None;
        }
        let sx = (map_x as f32 + 0.5 - self.center_x) * self.cols_per_cell
            + self.area.x as f32
            + self.area.width as f32 / 2.0;
        let sy = (map_y as f32 + 0.5 - self.center_y) * self.rows_per_cell
            + self.area.y as f32
            + self.area.height as f32 / 2.0;
        if sx < self.area.x as f32 || sy < self.area.y as f32 {
            return None;
        }
        let (col, row) = (sx.floor() as u16, sy.floor() as u16);
        if col >= self.area.x + self.area.width || row >= self.area.y + self.area.height {
            return None;
        }
        Some((col, row))
    }

    /// Screen movement in cells converted to map cells.
    pub fn screen_delta_to_map(&self, dcol: i32, drow: i32) -> (f32, f32) {
        if self.is_empty() {
            return (0.0, 0.0);
        }
        (
            dcol as f32 / self.cols_per_cell,
            drow as f32 / self.rows_per_cell,
        )
    }
}

#[derive(Clone, Default)]
pub struct MapRendererBuilder {
    config: RenderConfig,
    theme: MapTheme,
}

impl MapRendererBuilder {
    pub fn config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cell_aspect(mut self, value: f32) -> Self {
        self.config.cell_aspect = value;
        self
    }

    pub fn borders(mut self, value: bool) -> Self {
        self.config.borders = value;
        self
    }

    pub fn theme(mut self, theme: MapTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn build(self) -> MapRenderer {
        MapRenderer {
            config: self.config,
            theme: self.theme,
        }
    }
}

#[derive(Clone)]
pub struct MapRenderer {
    config: RenderConfig,
    theme: MapTheme,
}

impl MapRenderer {
    pub fn builder() -> MapRendererBuilder {
        MapRendererBuilder::default()
    }

    pub fn theme(&self) -> &MapTheme {
        &self.theme
    }

    pub fn render<M: MapRead + ?Sized>(
        &self,
        frame: &mut Frame,
        area: Rect,
        map: &M,
        view: &ViewTransform,
        highlight: &HighlightSet<'_>,
        hovered: Option<RegionId>,
    ) -> MapRenderResult {
        self.render_to_buffer(frame.buffer_mut(), area, map, view, highlight, hovered)
    }

    pub fn render_to_buffer<M: MapRead + ?Sized>(
        &self,
        buf: &mut Buffer,
        area: Rect,
        map: &M,
        view: &ViewTransform,
        highlight: &HighlightSet<'_>,
        hovered: Option<RegionId>,
    ) -> MapRenderResult {
        let map_size = map.map_size();
        let (center_x, center_y) = view.center();
        let mut result = MapRenderResult {
            area,
            map_width: map_size.width,
            map_height: map_size.height,
            center_x,
            center_y,
            ..MapRenderResult::default()
        };

        if area.width == 0 || area.height == 0 || map_size.is_empty() {
            return result;
        }

        let aspect = if self.config.cell_aspect > 0.0 {
            self.config.cell_aspect
        } else {
            1.0
        };
        let fit = (area.height as f32 / map_size.height as f32)
            .min(area.width as f32 / (map_size.width as f32 * aspect));
        result.rows_per_cell = fit * view.zoom();
        result.cols_per_cell = result.rows_per_cell * aspect;

        let lit: Vec<bool> = (0..map.region_count())
            .map(|idx| {
                map.region_name(RegionId(idx as u16))
                    .is_some_and(|name| highlight.contains(name))
            })
            .collect();
        let is_lit = |id: RegionId| lit.get(id.index()).copied().unwrap_or(false);

        let sample = |col: u16, row: u16| -> Option<RegionId> {
            let (x, y) = result.map_cell_at(col, row)?;
            map.region_at(x, y)
        };

        let density = self.theme.water_density.max(1) as u32;
        for row in area.y..area.y + area.height {
            for col in area.x..area.x + area.width {
                let Some(cell) = buf.cell_mut((col, row)) else {
                    continue;
                };

                let Some(region) = sample(col, row) else {
                    let (mx, my) = result.map_point(col, row);
                    let seed = water_seed(mx, my);
                    if seed % density == 0 {
                        cell.set_bg(self.theme.water)
                            .set_fg(self.theme.water_texture)
                            .set_char('~');
                    } else {
                        cell.set_bg(self.theme.water)
                            .set_fg(self.theme.water)
                            .set_char(' ');
                    }
                    continue;
                };

                let fill = self.theme.fill(is_lit(region), hovered == Some(region));
                cell.set_bg(fill).set_fg(self.theme.border).set_char(' ');

                if !self.config.borders {
                    continue;
                }
                let right_differs =
                    col + 1 < area.x + area.width && sample(col + 1, row) != Some(region);
                let below_differs =
                    row + 1 < area.y + area.height && sample(col, row + 1) != Some(region);
                if right_differs {
                    cell.set_char(BORDER_RIGHT);
                } else if below_differs {
                    cell.set_char(BORDER_BELOW);
                }
            }
        }

        result
    }
}

fn water_seed(mx: f32, my: f32) -> u32 {
    let x = mx.max(0.0).floor() as u16;
    let y = my.max(0.0).floor() as u16;
    let dx = (mx.fract().abs() * 4.0) as u16;
    let dy = (my.fract().abs() * 2.0) as u16;
    cell_seed(x, y, dx, dy)
}

pub fn adjust_color(color: Color, delta: i16) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let clamp = |v: i16| v.clamp(0, 255) as u8;
            Color::Rgb(
                clamp(r as i16 + delta),
                clamp(g as i16 + delta),
                clamp(b as i16 + delta),
            )
        }
        other => other,
    }
}

pub fn tile_seed(x: u16, y: u16) -> u32 {
    let mut n = x as u32;
    n = n
        .wrapping_mul(374_761_393)
        .wrapping_add((y as u32).wrapping_mul(668_265_263));
    n ^= n >> 13;
    n = n.wrapping_mul(1_274_126_177);
    n ^= n >> 16;
    n
}

pub fn cell_seed(x: u16, y: u16, dx: u16, dy: u16) -> u32 {
    let mut n = tile_seed(x, y);
    n ^= (dx as u32).wrapping_mul(2_246_822_519);
    n ^= (dy as u32).wrapping_mul(3_266_489_917);
    n ^= n >> 15;
    n = n.wrapping_mul(668_265_263);
    n ^= n >> 13;
    n
}
