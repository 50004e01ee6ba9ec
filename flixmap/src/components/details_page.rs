use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};
use world_map::prelude::HighlightSet;

use super::banner::{banner_height, contains, render_back_link, Banner, BannerKind, BannerProps};
use super::world_map_view::{world_atlas, WorldMapProps, WorldMapView};
use super::Component;
use crate::action::Action;
use crate::state::TitleSummary;
use crate::theme;

pub const NOT_AVAILABLE_MESSAGE: &str =
    "This title is not currently available on Netflix in any country we track.";

const CHIP_GAP: usize = 1;
/// The map keeps at least this many rows; the chip list takes the rest and
/// scrolls when it still doesn't fit.
const MIN_MAP_ROWS: u16 = 8;

pub struct DetailsPageProps<'a> {
    pub title: &'a TitleSummary,
    pub countries: &'a DataResource<Vec<String>>,
    pub spinner: &'a str,
    pub is_focused: bool,
}

/// Map view key for a title; a new key resets pan/zoom.
pub fn title_key(title: &TitleSummary) -> String {
    format!("{}:{}", title.media_type.as_str(), title.id)
}

/// Country chips flowed into lines of at most `width` columns. Names the
/// map can't place are dimmed.
fn chip_lines<'a>(
    countries: &'a [String],
    unmatched: &[&str],
    width: u16,
) -> Vec<Line<'a>> {
    let width = width.max(1) as usize;
    let mut lines = Vec::new();
    let mut current: Vec<Span<'a>> = Vec::new();
    let mut used = 0;

    for name in countries {
        let chip_w = name.chars().count() + 2;
        if used > 0 && used + CHIP_GAP + chip_w > width {
            lines.push(Line::from(std::mem::take(&mut current)));
            used = 0;
        }
        if used > 0 {
            current.push(Span::raw(" "));
            used += CHIP_GAP;
        }
        let style = if unmatched.contains(&name.as_str()) {
            Style::default().fg(theme::TEXT_MUTED).bg(theme::SURFACE)
        } else {
            Style::default().fg(theme::TEXT).bg(theme::PRIMARY_DARK)
        };
        current.push(Span::styled(format!(" {name} "), style));
        used += chip_w;
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

#[derive(Default)]
pub struct DetailsPage {
    map: WorldMapView,
    back_area: Rect,
    chip_scroll: u16,
    chip_scroll_max: u16,
    chip_page: u16,
    chip_key: String,
}

impl DetailsPage {
    pub fn new() -> Self {
        Self::default()
    }

    fn render_metadata(frame: &mut Frame, area: Rect, props: &DetailsPageProps<'_>) {
        let title = props.title;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::TEXT_MUTED))
            .style(Style::default().bg(theme::SURFACE));

        let badge = if title.media_type.is_series() {
            " TV "
        } else {
            " MOVIE "
        };
        let availability = match props.countries {
            DataResource::Loaded(list) => list.len().to_string(),
            _ => "...".to_string(),
        };
        let label = Style::default().fg(theme::TEXT_SECONDARY);
        let value = Style::default().fg(theme::TEXT);

        let mut lines = vec![Line::from(vec![
            Span::styled(
                badge,
                Style::default()
                    .fg(theme::TEXT)
                    .bg(theme::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                title.title.clone(),
                Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
            ),
        ])];
        if let Some(year) = title.year {
            lines.push(Line::from(vec![
                Span::styled("Released  ", label),
                Span::styled(year.to_string(), value),
            ]));
        }
        lines.push(Line::from(vec![
            Span::styled("Type      ", label),
            Span::styled(title.media_type.label(), value),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Available ", label),
            Span::styled(format!("in {availability} countries"), value),
        ]));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_availability(&mut self, frame: &mut Frame, area: Rect, props: &DetailsPageProps<'_>) {
        let countries = match props.countries {
            DataResource::Loaded(list) => list,
            DataResource::Failed(message) => {
                let height = banner_height(message, area.width).min(area.height);
                Banner.render(
                    frame,
                    Rect::new(area.x, area.y, area.width, height),
                    BannerProps {
                        kind: BannerKind::Info,
                        message,
                    },
                );
                return;
            }
            DataResource::Loading | DataResource::Empty => {
                frame.render_widget(
                    Paragraph::new(Line::from(vec![
                        Span::styled(
                            format!("{} ", props.spinner),
                            Style::default().fg(theme::PRIMARY),
                        ),
                        Span::styled(
                            "Loading availability data...",
                            Style::default().fg(theme::TEXT_SECONDARY),
                        ),
                    ])),
                    area,
                );
                return;
            }
        };

        if countries.is_empty() {
            let height = banner_height(NOT_AVAILABLE_MESSAGE, area.width).min(area.height);
            Banner.render(
                frame,
                Rect::new(area.x, area.y, area.width, height),
                BannerProps {
                    kind: BannerKind::Warning,
                    message: NOT_AVAILABLE_MESSAGE,
                },
            );
            return;
        }

        let unmatched = world_atlas()
            .map(|atlas| HighlightSet::from_names(countries).unmatched(atlas))
            .unwrap_or_default();
        let key = title_key(props.title);
        if self.chip_key != key {
            self.chip_key = key.clone();
            self.chip_scroll = 0;
        }

        let chips = chip_lines(countries, &unmatched, area.width);
        let footnote_h = u16::from(!unmatched.is_empty());
        let total_rows = chips.len() as u16;
        let room = area.height.saturating_sub(3 + footnote_h + MIN_MAP_ROWS).max(1);
        let chip_rows = total_rows.min(room);
        self.chip_page = chip_rows;
        self.chip_scroll_max = total_rows - chip_rows;
        self.chip_scroll = self.chip_scroll.min(self.chip_scroll_max);

        let [heading_area, sub_area, map_area, label_area, chips_area, footnote_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(1),
                Constraint::Length(chip_rows),
                Constraint::Length(footnote_h),
            ])
            .areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled(
                "Global Availability",
                Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
            )),
            heading_area,
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    format!("Available in {} countries ", countries.len()),
                    Style::default().fg(theme::TEXT_SECONDARY),
                ),
                Span::styled("(highlighted in red)", Style::default().fg(theme::PRIMARY)),
            ])),
            sub_area,
        );

        self.map.render(
            frame,
            map_area,
            WorldMapProps {
                countries,
                title_key: &key,
                is_focused: props.is_focused,
            },
        );

        let mut label = vec![Span::styled(
            "Available in:",
            Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
        )];
        if self.chip_scroll_max > 0 {
            let first = self.chip_scroll + 1;
            let last = self.chip_scroll + chip_rows;
            label.push(Span::styled(
                format!("  rows {first}-{last} of {total_rows} · PgUp/PgDn to scroll"),
                Style::default().fg(theme::TEXT_MUTED),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(label)), label_area);
        frame.render_widget(
            Paragraph::new(chips).scroll((self.chip_scroll, 0)),
            chips_area,
        );

        if !unmatched.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("{} not shown on map", unmatched.len()),
                    Style::default().fg(theme::TEXT_MUTED),
                )),
                footnote_area,
            );
        }
    }
}

impl Component<Action> for DetailsPage {
    type Props<'a> = DetailsPageProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        match event {
            EventKind::Key(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
                {
                    return vec![Action::Quit];
                }
                match key.code {
                    KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                        return vec![Action::NavBack]
                    }
                    KeyCode::Char('q') => return vec![Action::Quit],
                    KeyCode::PageDown | KeyCode::PageUp if self.chip_scroll_max > 0 => {
                        let page = self.chip_page.max(1);
                        let next = if key.code == KeyCode::PageDown {
                            self.chip_scroll.saturating_add(page).min(self.chip_scroll_max)
                        } else {
                            self.chip_scroll.saturating_sub(page)
                        };
                        if next == self.chip_scroll {
                            return Vec::new();
                        }
                        self.chip_scroll = next;
                        return vec![Action::Render];
                    }
                    _ => {}
                }
            }
            EventKind::Mouse(mouse)
                if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                    && contains(self.back_area, mouse.column, mouse.row) =>
            {
                return vec![Action::NavBack];
            }
            _ => {}
        }

        // Everything else drives the map once there is something to show.
        match props.countries {
            DataResource::Loaded(countries) if !countries.is_empty() => {
                let key = title_key(props.title);
                self.map
                    .handle_event(
                        event,
                        WorldMapProps {
                            countries,
                            title_key: &key,
                            is_focused: true,
                        },
                    )
                    .into_iter()
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let [body, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        let body = body.inner(Margin::new(2, 1));

        let meta_h = if props.title.year.is_some() { 6 } else { 5 };
        let [back_area, _, meta_area, _, availability_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(meta_h),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(body);

        self.back_area = render_back_link(frame, back_area, "Back to Results");
        Self::render_metadata(frame, meta_area, &props);
        self.render_availability(frame, availability_area, &props);

        let mut hints = vec![
            StatusBarHint::new("Esc", "back"),
            StatusBarHint::new("q", "quit"),
        ];
        if matches!(props.countries, DataResource::Loaded(list) if !list.is_empty()) {
            hints.push(StatusBarHint::new("←↑↓→", "pan"));
            hints.push(StatusBarHint::new("+/-", "zoom"));
            hints.push(StatusBarHint::new("0", "reset"));
        }
        if self.chip_scroll_max > 0 {
            hints.push(StatusBarHint::new("PgUp/PgDn", "countries"));
        }
        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            footer,
            StatusBarProps {
                left: StatusBarSection::hints(&hints),
                center: StatusBarSection::empty(),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}
