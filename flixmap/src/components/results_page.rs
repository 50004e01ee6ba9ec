use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::banner::{contains, render_back_link, Banner, BannerKind, BannerProps};
use super::Component;
use crate::action::Action;
use crate::catalog;
use crate::state::{TitleSummary, SKELETON_CARDS};
use crate::theme;

const CARD_HEIGHT: u16 = 6;
const CARD_GAP: u16 = 1;

pub struct ResultsPageProps<'a> {
    /// Raw search results; filtering and ranking happen here
    pub items: &'a [TitleSummary],
    pub cursor: usize,
    pub loading: bool,
    pub error: Option<&'a str>,
    pub query: &'a str,
    pub spinner: &'a str,
    pub is_focused: bool,
}

/// Cards per row for the available width.
pub fn grid_columns(width: u16) -> usize {
    match width {
        0..=47 => 1,
        48..=79 => 2,
        80..=111 => 3,
        112..=143 => 4,
        _ => 5,
    }
}

#[derive(Default)]
pub struct ResultsPage {
    columns: usize,
    back_area: Rect,
    /// Card rectangles from the last render with their ranked index
    cards: Vec<(Rect, usize)>,
}

impl ResultsPage {
    pub fn new() -> Self {
        Self {
            columns: 1,
            ..Self::default()
        }
    }

    fn columns(&self) -> usize {
        self.columns.max(1)
    }

    fn move_cursor(&self, cursor: usize, delta: isize, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let next = (cursor as isize + delta).clamp(0, count as isize - 1) as usize;
        (next != cursor).then_some(next)
    }

    fn render_card(frame: &mut Frame, area: Rect, title: &TitleSummary, selected: bool) {
        let border = if selected {
            Style::default().fg(theme::PRIMARY)
        } else {
            Style::default().fg(theme::TEXT_MUTED)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .style(Style::default().bg(theme::SURFACE));

        let mut meta = Vec::new();
        if let Some(year) = title.year {
            meta.push(Span::styled(
                year.to_string(),
                Style::default().fg(theme::TEXT_SECONDARY),
            ));
            meta.push(Span::styled(" • ", Style::default().fg(theme::TEXT_MUTED)));
        }
        meta.push(Span::styled(
            title.media_type.label(),
            Style::default().fg(theme::TEXT_SECONDARY),
        ));

        let rating = if title.rating_score() > 0.0 {
            Line::from(vec![
                Span::styled("★ ", Style::default().fg(theme::RATING)),
                Span::styled(
                    format!("{:.1}", title.rating_score()),
                    Style::default().fg(theme::TEXT),
                ),
            ])
        } else {
            Line::from(Span::styled(
                "No rating",
                Style::default().fg(theme::TEXT_MUTED),
            ))
        };

        let title_style = if selected {
            Style::default()
                .fg(theme::PRIMARY_LIGHT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
        };
        let lines = vec![
            Line::from(Span::styled(title.title.clone(), title_style)),
            Line::from(meta),
            Line::from(""),
            rating,
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_skeleton(frame: &mut Frame, area: Rect, spinner: &str) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::SKELETON))
            .style(Style::default().bg(theme::SURFACE));
        let bar = |len: u16| {
            Line::from(Span::styled(
                " ".repeat(len as usize),
                Style::default().bg(theme::SKELETON),
            ))
        };
        let inner_w = area.width.saturating_sub(2);
        let lines = vec![
            bar(inner_w.saturating_mul(4) / 5),
            bar(inner_w / 2),
            Line::from(""),
            Line::from(Span::styled(
                spinner.to_string(),
                Style::default().fg(theme::TEXT_MUTED),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    /// Lays out `count` cards, scrolled so the cursor row stays visible.
    fn card_slots(&self, area: Rect, count: usize, cursor: usize) -> Vec<(Rect, usize)> {
        let columns = self.columns();
        let row_h = CARD_HEIGHT + CARD_GAP;
        let visible_rows = ((area.height + CARD_GAP) / row_h).max(1) as usize;
        let cursor_row = cursor / columns;
        let first_row = cursor_row.saturating_sub(visible_rows - 1);

        let col_constraints = vec![Constraint::Fill(1); columns];
        let mut slots = Vec::new();
        for visible_row in 0..visible_rows {
            let row = first_row + visible_row;
            let y = area.y + visible_row as u16 * row_h;
            if y + CARD_HEIGHT > area.y + area.height {
                break;
            }
            let row_area = Rect::new(area.x, y, area.width, CARD_HEIGHT);
            let cells = Layout::horizontal(col_constraints.clone())
                .spacing(CARD_GAP)
                .split(row_area);
            for (col, cell) in cells.iter().enumerate() {
                let index = row * columns + col;
                if index >= count {
                    return slots;
                }
                slots.push((*cell, index));
            }
        }
        slots
    }
}

impl Component<Action> for ResultsPage {
    type Props<'a> = ResultsPageProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let shown = catalog::ranked_titles(props.items);
        let columns = self.columns() as isize;

        match event {
            EventKind::Key(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
                {
                    return vec![Action::Quit];
                }
                match key.code {
                    KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => vec![Action::NavBack],
                    KeyCode::Char('q') => vec![Action::Quit],
                    KeyCode::Char('r') | KeyCode::F(5) if !props.loading => {
                        vec![Action::ResultsRefresh]
                    }
                    _ if props.loading => Vec::new(),
                    KeyCode::Enter => shown
                        .get(props.cursor)
                        .map(|title| Action::TitleSelect((*title).clone()))
                        .into_iter()
                        .collect(),
                    KeyCode::Left | KeyCode::Char('h') => self
                        .move_cursor(props.cursor, -1, shown.len())
                        .map(Action::ResultsCursor)
                        .into_iter()
                        .collect(),
                    KeyCode::Right | KeyCode::Char('l') => self
                        .move_cursor(props.cursor, 1, shown.len())
                        .map(Action::ResultsCursor)
                        .into_iter()
                        .collect(),
                    KeyCode::Up | KeyCode::Char('k') => self
                        .move_cursor(props.cursor, -columns, shown.len())
                        .map(Action::ResultsCursor)
                        .into_iter()
                        .collect(),
                    KeyCode::Down | KeyCode::Char('j') => self
                        .move_cursor(props.cursor, columns, shown.len())
                        .map(Action::ResultsCursor)
                        .into_iter()
                        .collect(),
                    _ => Vec::new(),
                }
            }
            EventKind::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if contains(self.back_area, mouse.column, mouse.row) {
                    return vec![Action::NavBack];
                }
                if props.loading {
                    return Vec::new();
                }
                self.cards
                    .iter()
                    .find(|(rect, _)| contains(*rect, mouse.column, mouse.row))
                    .and_then(|(_, index)| shown.get(*index))
                    .map(|title| Action::TitleSelect((*title).clone()))
                    .into_iter()
                    .collect()
            }
            EventKind::Scroll { delta, .. } if !props.loading && *delta != 0 => {
                let step = (*delta).signum() as isize * columns;
                self.move_cursor(props.cursor, step, shown.len())
                    .map(Action::ResultsCursor)
                    .into_iter()
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let shown = catalog::ranked_titles(props.items);
        let [body, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        let body = body.inner(ratatui::layout::Margin::new(2, 1));

        let error_h = if props.error.is_some() { 4 } else { 0 };
        let [back_area, _, header_area, count_area, _, error_area, grid_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(error_h),
                Constraint::Min(1),
            ])
            .areas(body);

        self.back_area = render_back_link(frame, back_area, "Back to Search");
        self.columns = grid_columns(grid_area.width);

        let header = Line::from(vec![
            Span::styled(
                "Search Results",
                Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                if props.query.is_empty() {
                    String::new()
                } else {
                    format!("  for \"{}\"", props.query)
                },
                Style::default().fg(theme::TEXT_SECONDARY),
            ),
        ]);
        frame.render_widget(Paragraph::new(header), header_area);

        let count_line = if props.loading {
            format!("{} Searching for titles...", props.spinner)
        } else {
            format!("Found {} title(s) with posters", shown.len())
        };
        frame.render_widget(
            Paragraph::new(count_line).style(Style::default().fg(theme::TEXT_SECONDARY)),
            count_area,
        );

        if let Some(message) = props.error {
            let [banner_area, _] =
                Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(error_area);
            Banner.render(
                frame,
                banner_area,
                BannerProps {
                    kind: BannerKind::Error,
                    message,
                },
            );
        }

        self.cards.clear();
        if props.loading {
            for (rect, _) in self.card_slots(grid_area, SKELETON_CARDS, 0) {
                Self::render_skeleton(frame, rect, props.spinner);
            }
        } else if shown.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from("No titles with posters found").centered())
                    .style(Style::default().fg(theme::TEXT_SECONDARY)),
                grid_area,
            );
        } else {
            let cursor = props.cursor.min(shown.len() - 1);
            let slots = self.card_slots(grid_area, shown.len(), cursor);
            for (rect, index) in &slots {
                Self::render_card(frame, *rect, shown[*index], *index == cursor);
            }
            self.cards = slots;
        }

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            footer,
            StatusBarProps {
                left: StatusBarSection::hints(&[
                    StatusBarHint::new("←↑↓→", "move"),
                    StatusBarHint::new("Enter", "open"),
                    StatusBarHint::new("r", "refresh"),
                    StatusBarHint::new("Esc", "back"),
                    StatusBarHint::new("q", "quit"),
                ]),
                center: StatusBarSection::empty(),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MediaType;
    use tui_dispatch::testing::*;

    fn title(id: &str, poster: bool, rating: Option<f32>) -> TitleSummary {
        TitleSummary {
            id: id.into(),
            media_type: MediaType::Movie,
            title: format!("Title {id}"),
            year: Some(2010),
            poster: poster.then(|| format!("https://img/{id}.jpg")),
            rating,
        }
    }

    fn props<'a>(items: &'a [TitleSummary], cursor: usize, loading: bool) -> ResultsPageProps<'a> {
        ResultsPageProps {
            items,
            cursor,
            loading,
            error: None,
            query: "Inception",
            spinner: "⣾",
            is_focused: true,
        }
    }

    #[test]
    fn column_count_follows_width() {
        assert_eq!(grid_columns(30), 1);
        assert_eq!(grid_columns(60), 2);
        assert_eq!(grid_columns(100), 3);
        assert_eq!(grid_columns(120), 4);
        assert_eq!(grid_columns(200), 5);
    }

    #[test]
    fn enter_selects_ranked_title() {
        let items = vec![title("low", true, Some(2.0)), title("high", true, Some(9.0))];
        let mut page = ResultsPage::new();
        let actions: Vec<_> = page
            .handle_event(&EventKind::Key(key("enter")), props(&items, 0, false))
            .into_iter()
            .collect();
        actions.assert_first(Action::TitleSelect(items[1].clone()));
    }

    #[test]
    fn cursor_moves_within_bounds() {
        let items = vec![title("a", true, None), title("b", true, None)];
        let mut page = ResultsPage::new();

        let actions: Vec<_> = page
            .handle_event(&EventKind::Key(key("right")), props(&items, 0, false))
            .into_iter()
            .collect();
        actions.assert_first(Action::ResultsCursor(1));

        let actions: Vec<_> = page
            .handle_event(&EventKind::Key(key("right")), props(&items, 1, false))
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn selection_blocked_while_loading_but_back_works() {
        let items = vec![title("a", true, None)];
        let mut page = ResultsPage::new();

        let actions: Vec<_> = page
            .handle_event(&EventKind::Key(key("enter")), props(&items, 0, true))
            .into_iter()
            .collect();
        actions.assert_empty();

        let actions: Vec<_> = page
            .handle_event(&EventKind::Key(key("esc")), props(&items, 0, true))
            .into_iter()
            .collect();
        actions.assert_first(Action::NavBack);
    }

    #[test]
    fn renders_only_cards_with_posters() {
        let items = vec![title("with", true, Some(8.8)), title("without", false, Some(9.5))];
        let mut render = RenderHarness::new(100, 30);
        let mut page = ResultsPage::new();

        let output = render.render_to_string_plain(|frame| {
            page.render(frame, frame.area(), props(&items, 0, false));
        });

        assert!(output.contains("Found 1 title(s) with posters"));
        assert!(output.contains("Title with"));
        assert!(!output.contains("Title without"));
        assert!(output.contains("8.8"));
    }

    #[test]
    fn renders_skeletons_while_loading() {
        let items = vec![title("a", true, None)];
        let mut render = RenderHarness::new(100, 30);
        let mut page = ResultsPage::new();

        let output = render.render_to_string_plain(|frame| {
            page.render(frame, frame.area(), props(&items, 0, true));
        });

        assert!(output.contains("Searching for titles..."));
        assert!(!output.contains("Title a"));
    }

    #[test]
    fn renders_empty_message() {
        let items = vec![title("a", false, None)];
        let mut render = RenderHarness::new(80, 20);
        let mut page = ResultsPage::new();

        let output = render.render_to_string_plain(|frame| {
            page.render(frame, frame.area(), props(&items, 0, false));
        });

        assert!(output.contains("No titles with posters found"));
    }

    #[test]
    fn click_on_card_selects_it() {
        let items = vec![title("a", true, Some(5.0))];
        let mut render = RenderHarness::new(100, 30);
        let mut page = ResultsPage::new();
        render.render_to_string_plain(|frame| {
            page.render(frame, frame.area(), props(&items, 0, false));
        });

        let (rect, _) = page.cards[0];
        let click = EventKind::Mouse(crossterm::event::MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: rect.x + 1,
            row: rect.y + 1,
            modifiers: KeyModifiers::NONE,
        });
        let actions: Vec<_> = page
            .handle_event(&click, props(&items, 0, false))
            .into_iter()
            .collect();
        actions.assert_first(Action::TitleSelect(items[0].clone()));
    }
}
