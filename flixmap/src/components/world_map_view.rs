use std::sync::OnceLock;

use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use world_map::prelude::*;

use super::banner::contains;
use super::Component;
use crate::action::Action;
use crate::theme;

const KEY_ZOOM_STEP: f32 = 1.5;
const SCROLL_ZOOM_STEP: f32 = 1.25;
const PAN_STEP_X: f32 = 8.0;
const PAN_STEP_Y: f32 = 3.0;

/// Shared world atlas, built on first use. Build failures are logged once.
pub fn world_atlas() -> Option<&'static Atlas> {
    static ATLAS: OnceLock<Option<Atlas>> = OnceLock::new();
    ATLAS
        .get_or_init(|| match Atlas::world() {
            Ok(atlas) => {
                tracing::debug!(regions = atlas.region_count(), "world atlas ready");
                Some(atlas)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to build world atlas");
                None
            }
        })
        .as_ref()
}

pub struct WorldMapProps<'a> {
    pub countries: &'a [String],
    /// View state resets when this changes
    pub title_key: &'a str,
    pub is_focused: bool,
}

/// Interactive map: pan, zoom, hover tooltip.
pub struct WorldMapView {
    renderer: MapRenderer,
    view: Option<ViewTransform>,
    hovered: Option<RegionId>,
    /// Last pointer cell, relative to the painted map's top-left corner
    pointer: Option<(u16, u16)>,
    drag_from: Option<(u16, u16)>,
    last_render: MapRenderResult,
    title_key: String,
}

impl Default for WorldMapView {
    fn default() -> Self {
        let theme = MapTheme::builder()
            .highlight(theme::PRIMARY, theme::PRIMARY_DARK)
            .build();
        Self {
            renderer: MapRenderer::builder().theme(theme).build(),
            view: None,
            hovered: None,
            pointer: None,
            drag_from: None,
            last_render: MapRenderResult::default(),
            title_key: String::new(),
        }
    }
}

impl WorldMapView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> Option<&ViewTransform> {
        self.view.as_ref()
    }

    pub fn hovered(&self) -> Option<RegionId> {
        self.hovered
    }

    pub fn pointer(&self) -> Option<(u16, u16)> {
        self.pointer
    }

    fn sync_title(&mut self, title_key: &str) {
        if self.title_key != title_key {
            self.title_key = title_key.to_string();
            self.reset_view();
        }
    }

    fn reset_view(&mut self) {
        self.view = world_atlas().map(|atlas| ViewTransform::new(atlas.map_size()));
        self.hovered = None;
        self.pointer = None;
        self.drag_from = None;
    }

    fn view_mut(&mut self, atlas: &Atlas) -> &mut ViewTransform {
        self.view
            .get_or_insert_with(|| ViewTransform::new(atlas.map_size()))
    }

    fn pan_by(&mut self, atlas: &Atlas, dx: f32, dy: f32) {
        let size = atlas.map_size();
        let view = self.view_mut(atlas);
        let zoom = view.zoom();
        view.pan(dx / zoom, dy / zoom, size);
    }

    fn update_hover(&mut self, atlas: &Atlas, column: u16, row: u16) {
        let area = self.last_render.area;
        self.pointer = Some((
            column.saturating_sub(area.x).min(area.width.saturating_sub(1)),
            row.saturating_sub(area.y).min(area.height.saturating_sub(1)),
        ));
        self.hovered = self
            .last_render
            .map_cell_at(column, row)
            .and_then(|(x, y)| atlas.region_at(x, y));
    }

    fn render_tooltip(&self, frame: &mut Frame, map_area: Rect, name: &str, available: bool) {
        let Some((dx, dy)) = self.pointer else {
            return;
        };
        let origin = self.last_render.area;
        let (col, row) = (origin.x + dx, origin.y + dy);
        let label = if available {
            format!(" {name} • Available ")
        } else {
            format!(" {name} ")
        };
        let width = (label.chars().count() as u16).min(map_area.width);
        if width == 0 || map_area.height == 0 {
            return;
        }
        let right = map_area.x + map_area.width;
        let x = (col + 2).min(right.saturating_sub(width)).max(map_area.x);
        let y = if row > map_area.y { row - 1 } else { row + 1 };
        let y = y.min(map_area.y + map_area.height - 1);
        let tip = Rect::new(x, y, width, 1);
        let style = if available {
            Style::default()
                .fg(theme::TEXT)
                .bg(theme::PRIMARY_DARK)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT).bg(theme::SURFACE)
        };
        frame.render_widget(Clear, tip);
        frame.render_widget(Paragraph::new(label).style(style), tip);
    }
}

impl Component<Action> for WorldMapView {
    type Props<'a> = WorldMapProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let Some(atlas) = world_atlas() else {
            return None;
        };
        self.sync_title(props.title_key);

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Left => self.pan_by(atlas, -PAN_STEP_X, 0.0),
                KeyCode::Right => self.pan_by(atlas, PAN_STEP_X, 0.0),
                KeyCode::Up => self.pan_by(atlas, 0.0, -PAN_STEP_Y),
                KeyCode::Down => self.pan_by(atlas, 0.0, PAN_STEP_Y),
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    self.view_mut(atlas).zoom_by(KEY_ZOOM_STEP)
                }
                KeyCode::Char('-') | KeyCode::Char('_') => {
                    self.view_mut(atlas).zoom_by(1.0 / KEY_ZOOM_STEP)
                }
                KeyCode::Char('0') => self.reset_view(),
                _ => return None,
            },
            EventKind::Mouse(mouse) => {
                let inside = contains(self.last_render.area, mouse.column, mouse.row);
                match mouse.kind {
                    MouseEventKind::Moved if inside => {
                        self.update_hover(atlas, mouse.column, mouse.row)
                    }
                    MouseEventKind::Moved => {
                        if self.hovered.is_none() && self.pointer.is_none() {
                            return None;
                        }
                        self.hovered = None;
                        self.pointer = None;
                    }
                    MouseEventKind::Down(MouseButton::Left) if inside => {
                        self.drag_from = Some((mouse.column, mouse.row));
                        return None;
                    }
                    MouseEventKind::Drag(MouseButton::Left) => {
                        let Some((from_col, from_row)) = self.drag_from else {
                            return None;
                        };
                        let dcol = from_col as i32 - mouse.column as i32;
                        let drow = from_row as i32 - mouse.row as i32;
                        let (dx, dy) = self.last_render.screen_delta_to_map(dcol, drow);
                        let size = atlas.map_size();
                        self.view_mut(atlas).pan(dx, dy, size);
                        self.drag_from = Some((mouse.column, mouse.row));
                        self.update_hover(atlas, mouse.column, mouse.row);
                    }
                    MouseEventKind::Up(MouseButton::Left) => {
                        self.drag_from = None;
                        return None;
                    }
                    _ => return None,
                }
            }
            EventKind::Scroll { delta, .. } if *delta != 0 => {
                let factor = if *delta < 0 {
                    SCROLL_ZOOM_STEP
                } else {
                    1.0 / SCROLL_ZOOM_STEP
                };
                self.view_mut(atlas).zoom_by(factor);
            }
            _ => return None,
        }
        Some(Action::Render)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.sync_title(props.title_key);
        let [map_area, hint_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::TEXT_MUTED));
        let inner = block.inner(map_area);
        frame.render_widget(block, map_area);

        let Some(atlas) = world_atlas() else {
            self.last_render = MapRenderResult::default();
            frame.render_widget(
                Paragraph::new(Line::from("Map unavailable").centered())
                    .style(Style::default().fg(theme::TEXT_MUTED)),
                inner,
            );
            return;
        };

        let view = *self.view_mut(atlas);
        let highlight = HighlightSet::from_names(props.countries);
        self.last_render =
            self.renderer
                .render(frame, inner, atlas, &view, &highlight, self.hovered);

        if let Some(name) = self.hovered.and_then(|id| atlas.region_name(id)) {
            let available = highlight.contains(name);
            self.render_tooltip(frame, inner, name, available);
        }

        let hint = Line::from(vec![
            Span::styled(
                format!("zoom {:.1}×", view.zoom()),
                Style::default().fg(theme::TEXT_SECONDARY),
            ),
            Span::styled(
                "  ·  drag or arrows to pan  ·  scroll or +/- to zoom  ·  0 to reset",
                Style::default().fg(theme::TEXT_MUTED),
            ),
        ]);
        frame.render_widget(Paragraph::new(hint), hint_area);
    }
}
