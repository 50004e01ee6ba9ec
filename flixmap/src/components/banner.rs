use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use super::Component;
use crate::action::Action;
use crate::theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Warning,
    Info,
}

impl BannerKind {
    fn icon(self) -> &'static str {
        match self {
            BannerKind::Error => "✖",
            BannerKind::Warning => "⚠",
            BannerKind::Info => "🌐",
        }
    }

    fn color(self) -> ratatui::style::Color {
        match self {
            BannerKind::Error => theme::ERROR,
            BannerKind::Warning => theme::WARNING,
            BannerKind::Info => theme::INFO,
        }
    }
}

/// Inline alert box
pub struct Banner;

pub struct BannerProps<'a> {
    pub kind: BannerKind,
    pub message: &'a str,
}

/// Rows a banner needs for `message` at `width`, borders included.
pub fn banner_height(message: &str, width: u16) -> u16 {
    let inner = width.saturating_sub(6).max(1) as usize;
    let chars = message.chars().count().max(1);
    (chars.div_ceil(inner) as u16) + 2
}

impl Component<Action> for Banner {
    type Props<'a> = BannerProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let color = props.kind.color();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color));
        let line = Line::from(vec![
            Span::styled(
                format!("{} ", props.kind.icon()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(props.message.to_string(), Style::default().fg(theme::TEXT)),
        ]);
        frame.render_widget(
            Paragraph::new(line).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }
}

/// Clickable "← label" line; returns the area it occupies.
pub fn render_back_link(frame: &mut Frame, area: Rect, label: &str) -> Rect {
    let text = format!("← {label}");
    let width = (text.chars().count() as u16).min(area.width);
    let link_area = Rect::new(area.x, area.y, width, area.height.min(1));
    frame.render_widget(
        Paragraph::new(Span::styled(
            text,
            Style::default()
                .fg(theme::PRIMARY_LIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        link_area,
    );
    link_area
}

pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && row >= area.y
        && column < area.x.saturating_add(area.width)
        && row < area.y.saturating_add(area.height)
}
