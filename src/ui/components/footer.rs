use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::palette::{FOOTER_BG, KEY_BG, TEXT_MUTED, TEXT_SECONDARY};
use crate::ui::focus::FocusTarget;

/// Which hints the footer shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FooterContext {
    #[default]
    Welcome,
    /// Editing a section; carries the focused control
    Editing {
        focus: Option<FocusTarget>,
        final_section: bool,
    },
    Submitting,
    Submitted,
}

/// Bottom bar listing the keys that do something right now
pub struct Footer {
    hints: Vec<(&'static str, &'static str)>,
}

impl Footer {
    pub fn for_context(context: FooterContext) -> Self {
        let hints = match context {
            FooterContext::Welcome => vec![("enter", "begin"), ("C-q", "quit")],
            FooterContext::Editing {
                focus,
                final_section,
            } => {
                let mut hints = vec![("tab", "next field")];
                match focus {
                    Some(FocusTarget::Choice(_)) => {
                        hints.push(("↑↓", "option"));
                        hints.push(("space", "select"));
                    }
                    Some(FocusTarget::Set(_)) => {
                        hints.push(("↑↓", "option"));
                        hints.push(("space", "toggle"));
                    }
                    Some(FocusTarget::ListItem(..)) => {
                        hints.push(("enter", "add"));
                        hints.push(("C-d", "remove"));
                    }
                    Some(FocusTarget::Text(_)) | None => {}
                }
                hints.push(("C-p", "back"));
                if final_section {
                    hints.push(("C-s", "submit"));
                } else {
                    hints.push(("C-n", "next"));
                }
                hints.push(("C-q", "quit"));
                hints
            }
            FooterContext::Submitting => Vec::new(),
            FooterContext::Submitted => vec![("enter", "close")],
        };
        Self { hints }
    }

    pub fn hints(&self) -> &[(&'static str, &'static str)] {
        &self.hints
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, action)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            spans.push(Span::styled(
                format!(" {} ", key),
                Style::default().fg(TEXT_SECONDARY).bg(KEY_BG),
            ));
            spans.push(Span::styled(
                format!(" {}", action),
                Style::default().fg(TEXT_MUTED),
            ));
        }
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(FOOTER_BG))
            .render(area, buf);
    }
}
