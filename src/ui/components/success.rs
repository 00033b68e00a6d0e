use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use super::palette::{ACCENT_SUCCESS, TEXT_MUTED, TEXT_PRIMARY, TEXT_SECONDARY};
use crate::submit::Submitted;

/// Confirmation shown after a successful submission
pub struct SuccessScreen<'a> {
    submitted: &'a Submitted,
}

impl<'a> SuccessScreen<'a> {
    pub fn new(submitted: &'a Submitted) -> Self {
        Self { submitted }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let [_, card, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(12),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, card, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(60),
            Constraint::Fill(1),
        ])
        .areas(card);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT_SUCCESS));
        let inner = block.inner(card);
        block.render(card, buf);

        let receipt = &self.submitted.receipt;
        let lines = vec![
            Line::styled("✓", Style::default().fg(ACCENT_SUCCESS)),
            Line::styled(
                format!("Thank You, {}!", self.submitted.response.display_name()),
                Style::default()
                    .fg(TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
            Line::styled(
                "Your responses have been saved successfully! \
                 Thank you for taking the time to share your thoughts.",
                Style::default().fg(TEXT_SECONDARY),
            ),
            Line::raw(""),
            Line::styled(
                "Your thoughtful reflection is appreciated.",
                Style::default().fg(TEXT_SECONDARY),
            ),
            Line::raw(""),
            Line::styled(
                format!("Saved via {}", receipt.backend),
                Style::default().fg(TEXT_MUTED),
            ),
        ];

        Paragraph::new(lines)
            .centered()
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
