use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use super::palette::{
    ACCENT_PRIMARY, ACCENT_SUCCESS, BORDER_FOCUSED, TEXT_MUTED, TEXT_PRIMARY,
};

pub const WELCOME_TITLE: &str = "2025 - Look Back";

/// Landing screen shown before the first section
pub struct WelcomeScreen {
    restored: bool,
}

impl WelcomeScreen {
    pub fn new(restored: bool) -> Self {
        Self { restored }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let [_, card, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(9),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, card, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(44),
            Constraint::Fill(1),
        ])
        .areas(card);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_FOCUSED));
        let inner = block.inner(card);
        block.render(card, buf);

        let mut lines = vec![
            Line::raw(""),
            Line::styled(
                WELCOME_TITLE,
                Style::default()
                    .fg(TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::styled("A space to reflect on your year", Style::default().fg(TEXT_MUTED)),
            Line::raw(""),
            Line::from(Span::styled(
                " Begin Reflection ",
                Style::default()
                    .fg(ACCENT_PRIMARY)
                    .add_modifier(Modifier::REVERSED | Modifier::BOLD),
            )),
        ];
        if self.restored {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                "Restored your saved progress",
                Style::default().fg(ACCENT_SUCCESS),
            ));
        }

        Paragraph::new(lines).centered().render(inner, buf);
    }
}
