use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle, TextInput, TextInputProps, TextInputStyle,
};

use super::banner::{banner_height, contains, Banner, BannerKind, BannerProps};
use super::headline::{Headline, HeadlineProps, HEADLINE_TEXT};
use super::Component;
use crate::action::Action;
use crate::state::BackendHealth;
use crate::theme;

pub const SEARCH_PLACEHOLDER: &str = "Enter a movie or TV show title...";
const TAGLINE: &str =
    "Find movies and TV shows on Netflix and see which countries they're available in!";
const CONTENT_WIDTH: u16 = 72;

pub struct SearchPageProps<'a> {
    pub query: &'a str,
    pub error: Option<&'a str>,
    pub loading: bool,
    pub spinner: &'a str,
    pub tick_count: u32,
    pub backend: &'a DataResource<BackendHealth>,
    pub api_base: &'a str,
    pub is_focused: bool,
}

pub struct SearchPage {
    input: TextInput,
    submit_area: Rect,
    clear_area: Rect,
}

impl Default for SearchPage {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            submit_area: Rect::default(),
            clear_area: Rect::default(),
        }
    }
}

impl SearchPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh input (cursor at start) for a new visit to the page.
    pub fn reset(&mut self) {
        self.input = TextInput::new();
        self.submit_area = Rect::default();
        self.clear_area = Rect::default();
    }

    fn input_style(loading: bool) -> TextInputStyle {
        TextInputStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 1),
                bg: Some(theme::SURFACE),
                fg: Some(if loading {
                    theme::TEXT_MUTED
                } else {
                    theme::TEXT
                }),
            },
            placeholder_style: None,
            cursor_style: None,
        }
    }

    fn button_label(props: &SearchPageProps<'_>) -> String {
        if props.loading {
            format!(" {} Searching... ", props.spinner)
        } else {
            " ⌕ Search ".to_string()
        }
    }

    fn health_span(props: &SearchPageProps<'_>) -> Span<'static> {
        match props.backend {
            DataResource::Loaded(health) if health.api_key_configured => Span::styled(
                format!("● {}", props.api_base),
                Style::default().fg(theme::SUCCESS),
            ),
            DataResource::Loaded(_) => Span::styled(
                "● backend up, TMDB key missing".to_string(),
                Style::default().fg(theme::WARNING),
            ),
            DataResource::Failed(_) => Span::styled(
                format!("● {} unreachable", props.api_base),
                Style::default().fg(theme::ERROR),
            ),
            DataResource::Loading => Span::styled(
                format!("{} checking backend", props.spinner),
                Style::default().fg(theme::TEXT_SECONDARY),
            ),
            DataResource::Empty => Span::raw(String::new()),
        }
    }
}

impl Component<Action> for SearchPage {
    type Props<'a> = SearchPageProps<'a>;

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
                // Input and buttons are disabled while searching.
                if props.loading {
                    return Vec::new();
                }
                if key.code == KeyCode::Esc {
                    return if props.query.is_empty() {
                        vec![Action::Quit]
                    } else {
                        vec![Action::SearchClear]
                    };
                }

                let input_props = TextInputProps {
                    value: props.query,
                    placeholder: SEARCH_PLACEHOLDER,
                    is_focused: true,
                    style: Self::input_style(false),
                    on_change: Action::SearchQueryChange,
                    on_submit: Action::SearchSubmit,
                    on_cursor_move: Some(|_| Action::Render),
                };
                self.input
                    .handle_event(event, input_props)
                    .into_iter()
                    .collect()
            }
            EventKind::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if props.loading {
                    return Vec::new();
                }
                if contains(self.submit_area, mouse.column, mouse.row) {
                    vec![Action::SearchSubmit(props.query.to_string())]
                } else if !props.query.is_empty()
                    && contains(self.clear_area, mouse.column, mouse.row)
                {
                    vec![Action::SearchClear]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let [body, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        let [column] = Layout::horizontal([Constraint::Max(CONTENT_WIDTH)])
            .flex(Flex::Center)
            .areas(body);

        let error_h = props
            .error
            .map(|msg| banner_height(msg, column.width) + 1)
            .unwrap_or(0);
        let [_, headline_area, tagline_area, _, form_area, _, error_area, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Max(6),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(error_h),
            Constraint::Fill(1),
        ])
        .areas(column);

        Headline.render(
            frame,
            headline_area,
            HeadlineProps {
                text: HEADLINE_TEXT,
                is_animating: props.loading,
                tick_count: props.tick_count,
            },
        );

        frame.render_widget(
            Paragraph::new(Line::from(TAGLINE).centered())
                .style(Style::default().fg(theme::TEXT_SECONDARY))
                .wrap(ratatui::widgets::Wrap { trim: true }),
            tagline_area,
        );

        let button = Self::button_label(&props);
        let button_w = button.chars().count() as u16;
        let clear_label = " ✕ Clear ";
        let clear_w = if props.query.is_empty() {
            0
        } else {
            clear_label.chars().count() as u16
        };
        let [input_area, _, submit_area, _, clear_area] = Layout::horizontal([
            Constraint::Min(10),
            Constraint::Length(1),
            Constraint::Length(button_w),
            Constraint::Length(if clear_w > 0 { 1 } else { 0 }),
            Constraint::Length(clear_w),
        ])
        .areas(form_area);

        let input_props = TextInputProps {
            value: props.query,
            placeholder: SEARCH_PLACEHOLDER,
            is_focused: props.is_focused && !props.loading,
            style: Self::input_style(props.loading),
            on_change: Action::SearchQueryChange,
            on_submit: Action::SearchSubmit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input.render(frame, input_area, input_props);

        let button_style = if props.loading {
            Style::default().fg(theme::TEXT_SECONDARY).bg(theme::PRIMARY_DARK)
        } else {
            Style::default()
                .fg(theme::TEXT)
                .bg(theme::PRIMARY)
                .add_modifier(Modifier::BOLD)
        };
        let [_, submit_line, _] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(submit_area);
        frame.render_widget(Paragraph::new(button).style(button_style), submit_line);
        self.submit_area = submit_area;

        if clear_w > 0 {
            let [_, clear_line, _] = Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(clear_area);
            let clear_style = if props.loading {
                Style::default().fg(theme::TEXT_MUTED)
            } else {
                Style::default().fg(theme::PRIMARY_LIGHT)
            };
            frame.render_widget(Paragraph::new(clear_label).style(clear_style), clear_line);
            self.clear_area = clear_area;
        } else {
            self.clear_area = Rect::default();
        }

        if let Some(message) = props.error {
            let [banner_area, _] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(error_area);
            Banner.render(
                frame,
                banner_area,
                BannerProps {
                    kind: BannerKind::Error,
                    message,
                },
            );
        }

        let esc_label = if props.query.is_empty() { "quit" } else { "clear" };
        let status_items = [StatusBarItem::span(Self::health_span(&props))];
        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            footer,
            StatusBarProps {
                left: StatusBarSection::hints(&[
                    StatusBarHint::new("Enter", "search"),
                    StatusBarHint::new("Esc", esc_label),
                ]),
                center: StatusBarSection::empty(),
                right: StatusBarSection::items(&status_items),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}
