//! Renders the current section: header with progress, then the questions.

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, Paragraph, Widget},
};

use super::palette::{
    ACCENT_ERROR, ACCENT_PRIMARY, ACCENT_SUCCESS, ACCENT_WARNING, BORDER_DEFAULT, TEXT_FAINT,
    TEXT_MUTED, TEXT_PRIMARY, TEXT_SECONDARY,
};
use super::spinner::Spinner;
use super::wrap::wrap_text;
use crate::survey::{FieldRef, FieldStore, Question, Section, TextField};
use crate::ui::focus::FocusTarget;
use crate::wizard::{Wizard, WizardPhase};

const GUTTER: &str = "  │ ";
const GUTTER_WIDTH: usize = 4;

/// Lines of the scrollable body plus the line holding the focused control
struct Body {
    lines: Vec<Line<'static>>,
    focus_line: Option<usize>,
}

impl Body {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            focus_line: None,
        }
    }

    fn push(&mut self, line: Line<'static>) {
        self.lines.push(line);
    }

    fn blank(&mut self) {
        self.lines.push(Line::raw(""));
    }

    fn mark_focus(&mut self) {
        self.focus_line = Some(self.lines.len().saturating_sub(1));
    }

    fn paragraph(&mut self, text: &str, width: usize, style: Style) {
        for line in wrap_text(text, width) {
            self.push(Line::styled(line, style));
        }
    }
}

pub struct SectionView<'a> {
    wizard: &'a Wizard,
    focus: Option<FocusTarget>,
    option_cursor: usize,
    tick: usize,
}

impl<'a> SectionView<'a> {
    pub fn new(wizard: &'a Wizard, focus: Option<FocusTarget>, option_cursor: usize) -> Self {
        Self {
            wizard,
            focus,
            option_cursor,
            tick: 0,
        }
    }

    /// Animation frame for the submitting spinner
    pub fn with_tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let [header, body] =
            Layout::vertical([Constraint::Length(4), Constraint::Min(1)]).areas(area);
        self.render_header(header, buf);

        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(BORDER_DEFAULT));
        let inner = block.inner(body);
        block.render(body, buf);

        let width = (inner.width as usize).saturating_sub(2).max(10);
        let content = self.body(width);

        // Keep the focused control visible with a little context below it
        let height = inner.height as usize;
        let scroll = match content.focus_line {
            Some(line) if height > 0 && line + 3 > height => (line + 3 - height) as u16,
            _ => 0,
        };

        Paragraph::new(content.lines)
            .scroll((scroll, 0))
            .render(inner.inner(ratatui::layout::Margin::new(1, 0)), buf);
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let section = self.wizard.section();
        let [title_row, tagline_row, gauge_row, _] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let [title_area, saved_area] =
            Layout::horizontal([Constraint::Min(10), Constraint::Length(14)]).areas(title_row);

        Paragraph::new(Line::from(Span::styled(
            format!(" {}", section.title()),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )))
        .render(title_area, buf);

        if let Some(saved) = self.wizard.last_saved() {
            let local = saved.with_timezone(&Local);
            Paragraph::new(Line::styled(
                format!("Saved {} ", local.format("%H:%M")),
                Style::default().fg(ACCENT_SUCCESS),
            ))
            .right_aligned()
            .render(saved_area, buf);
        }

        Paragraph::new(Line::styled(
            format!(" {}", section.tagline()),
            Style::default().fg(TEXT_MUTED),
        ))
        .render(tagline_row, buf);

        let progress = self.wizard.progress();
        LineGauge::default()
            .ratio(f64::from(progress.percent) / 100.0)
            .label(format!(
                " Section {} of {} · {}%",
                progress.position, progress.total, progress.percent
            ))
            .filled_style(Style::default().fg(ACCENT_PRIMARY))
            .unfilled_style(Style::default().fg(TEXT_FAINT))
            .render(gauge_row, buf);
    }

    fn body(&self, width: usize) -> Body {
        let mut body = Body::new();
        let section = self.wizard.section();

        if let Some(err) = self.wizard.validation_error() {
            body.push(Line::styled(
                format!("⚠ {}", err),
                Style::default().fg(ACCENT_ERROR),
            ));
            body.blank();
        }

        if let Some(quote) = section.quote() {
            body.paragraph(
                &format!("“{}” - Sadhguru", quote),
                width,
                Style::default()
                    .fg(TEXT_MUTED)
                    .add_modifier(Modifier::ITALIC),
            );
            body.blank();
        }

        match section {
            Section::Welcome => self.intro(&mut body, width),
            Section::Review => self.review(&mut body, width),
            _ => {
                for question in section.questions() {
                    self.question(&mut body, question, width);
                }
            }
        }

        body
    }

    fn intro(&self, body: &mut Body, width: usize) {
        let r = self.wizard.response();
        let role = if r.role.trim().is_empty() {
            String::new()
        } else {
            format!(" as a {}", r.role.trim())
        };
        let product = if r.product.trim().is_empty() {
            String::new()
        } else {
            format!(" in the {} team", r.product.trim())
        };

        body.paragraph(
            &format!(
                "Dear {}, this is your Space to Reflect",
                r.display_name()
            ),
            width,
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        );
        body.blank();
        body.paragraph(
            &format!(
                "Think of this as a quiet pause to acknowledge your year, the work you did{}{}, \
                 the effort you put in, the wins you had, and the struggles along the way.",
                role, product
            ),
            width,
            Style::default().fg(TEXT_SECONDARY),
        );
        body.blank();
        body.push(Line::styled(
            "A few notes before you start",
            Style::default().fg(TEXT_PRIMARY),
        ));
        for note in [
            "Expected time: ~30 minutes",
            "Please feel free to skip any questions that don't resonate with you",
            "This is a safe space; your inputs will not be shared with peers",
            "The intent is reflection and learning, not evaluation",
            "There are no \"right\" answers. Specific and honest is more valuable than polished.",
        ] {
            body.paragraph(&format!("• {}", note), width, Style::default().fg(TEXT_SECONDARY));
        }
    }

    fn review(&self, body: &mut Body, width: usize) {
        let r = self.wizard.response();
        body.push(Line::styled(
            "Ready to submit?",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));
        body.paragraph(
            "Make sure you've filled in all the sections you want to complete. \
             You can go back to any section to make changes before submitting.",
            width,
            Style::default().fg(TEXT_SECONDARY),
        );
        body.blank();
        body.push(Line::from(vec![
            Span::styled("Name   ", Style::default().fg(TEXT_MUTED)),
            Span::styled(r.name.clone(), Style::default().fg(TEXT_PRIMARY)),
        ]));
        body.push(Line::from(vec![
            Span::styled("Email  ", Style::default().fg(TEXT_MUTED)),
            Span::styled(r.email.clone(), Style::default().fg(TEXT_PRIMARY)),
        ]));
        body.push(Line::styled(
            format!("{} questions answered", answered_count(self.wizard.fields())),
            Style::default().fg(TEXT_MUTED),
        ));
        body.blank();

        match self.wizard.phase() {
            WizardPhase::Submitting => {
                body.push(Line::styled(
                    format!("{} Submitting...", Spinner::frame_at(self.tick)),
                    Style::default().fg(ACCENT_WARNING),
                ));
            }
            WizardPhase::Failed { message } => {
                body.paragraph(message, width, Style::default().fg(ACCENT_ERROR));
                body.blank();
                body.push(Line::styled(
                    "Press Ctrl+S to try again.",
                    Style::default().fg(TEXT_SECONDARY),
                ));
            }
            _ if !r.has_identity() => {
                body.push(Line::styled(
                    "Name and email are required before submitting.",
                    Style::default().fg(ACCENT_ERROR),
                ));
            }
            _ => {
                body.push(Line::styled(
                    "Press Ctrl+S to submit your survey.",
                    Style::default().fg(ACCENT_PRIMARY),
                ));
            }
        }
        body.mark_focus();
    }

    fn question(&self, body: &mut Body, question: &Question, width: usize) {
        let fields = self.wizard.fields();
        if question.field == FieldRef::Text(TextField::FeedbackStopsOther)
            && !fields.wants_other_detail()
        {
            return;
        }

        let focused = match (question.field, self.focus) {
            (FieldRef::Text(a), Some(FocusTarget::Text(b))) => a == b,
            (FieldRef::Choice(a), Some(FocusTarget::Choice(b))) => a == b,
            (FieldRef::Set(a), Some(FocusTarget::Set(b))) => a == b,
            (FieldRef::List(a), Some(FocusTarget::ListItem(b, _))) => a == b,
            _ => false,
        };
        let prompt_style = if focused {
            Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_PRIMARY)
        };
        let prompt = if question.required {
            format!("{} *", question.prompt)
        } else {
            question.prompt.to_string()
        };
        body.paragraph(&prompt, width, prompt_style);

        let inner = width.saturating_sub(GUTTER_WIDTH + 1).max(1);
        match question.field {
            FieldRef::Text(field) => {
                text_lines(body, fields.text(field), inner, focused, field.is_multiline());
                if focused {
                    body.mark_focus();
                }
            }
            FieldRef::Choice(field) => {
                let selected = fields.choice_index(field);
                for (i, label) in field.options().into_iter().enumerate() {
                    let marker = if selected == Some(i) { "(•)" } else { "( )" };
                    option_line(body, marker, label, focused && self.option_cursor == i);
                    if focused && self.option_cursor == i {
                        body.mark_focus();
                    }
                }
            }
            FieldRef::Set(field) => {
                for (i, label) in field.options().into_iter().enumerate() {
                    let marker = if fields.is_set_member(field, i) {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    option_line(body, marker, label, focused && self.option_cursor == i);
                    if focused && self.option_cursor == i {
                        body.mark_focus();
                    }
                }
            }
            FieldRef::List(field) => {
                for (i, item) in fields.list(field).iter().enumerate() {
                    let item_focused = self.focus == Some(FocusTarget::ListItem(field, i));
                    list_item_lines(body, i, item, inner, item_focused);
                    if item_focused {
                        body.mark_focus();
                    }
                }
            }
        }
        body.blank();
    }
}

fn gutter_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT_PRIMARY)
    } else {
        Style::default().fg(BORDER_DEFAULT)
    }
}

fn text_lines(body: &mut Body, value: &str, width: usize, focused: bool, multiline: bool) {
    if value.is_empty() && !focused {
        let placeholder = if multiline {
            "Share your thoughts..."
        } else {
            ""
        };
        body.push(Line::from(vec![
            Span::styled(GUTTER, gutter_style(false)),
            Span::styled(placeholder, Style::default().fg(TEXT_FAINT)),
        ]));
        return;
    }

    let wrapped = wrap_text(value, width);
    let last = wrapped.len() - 1;
    for (i, line) in wrapped.into_iter().enumerate() {
        let mut spans = vec![
            Span::styled(GUTTER, gutter_style(focused)),
            Span::styled(line, Style::default().fg(TEXT_PRIMARY)),
        ];
        if focused && i == last {
            spans.push(Span::styled("▏", Style::default().fg(ACCENT_PRIMARY)));
        }
        body.push(Line::from(spans));
    }
}

fn option_line(body: &mut Body, marker: &str, label: &str, highlighted: bool) {
    let (pointer, style) = if highlighted {
        ("  › ", Style::default().fg(ACCENT_PRIMARY))
    } else {
        ("    ", Style::default().fg(TEXT_SECONDARY))
    };
    body.push(Line::from(vec![
        Span::styled(pointer, style),
        Span::styled(format!("{} {}", marker, label), style),
    ]));
}

fn list_item_lines(body: &mut Body, index: usize, value: &str, width: usize, focused: bool) {
    let number = format!("{}. ", index + 1);
    let wrapped = wrap_text(value, width.saturating_sub(number.len()).max(1));
    let last = wrapped.len() - 1;
    for (i, line) in wrapped.into_iter().enumerate() {
        let lead = if i == 0 {
            number.clone()
        } else {
            " ".repeat(number.len())
        };
        let mut spans = vec![
            Span::styled(GUTTER, gutter_style(focused)),
            Span::styled(lead, Style::default().fg(TEXT_MUTED)),
            Span::styled(line, Style::default().fg(TEXT_PRIMARY)),
        ];
        if focused && i == last {
            spans.push(Span::styled("▏", Style::default().fg(ACCENT_PRIMARY)));
        }
        body.push(Line::from(spans));
    }
}

/// Number of answered questions, for summaries
pub fn answered_count(fields: &FieldStore) -> usize {
    Section::ALL
        .iter()
        .flat_map(|s| s.questions())
        .filter(|q| match q.field {
            FieldRef::Text(f) => !fields.text(f).trim().is_empty(),
            FieldRef::Choice(f) => fields.choice_index(f).is_some(),
            FieldRef::Set(f) => (0..f.options().len()).any(|i| fields.is_set_member(f, i)),
            FieldRef::List(f) => fields.list(f).iter().any(|item| !item.trim().is_empty()),
        })
        .count()
}
