//! Keyboard focus within a section

use crate::survey::{ChoiceField, FieldRef, FieldStore, ListField, Section, SetField, TextField};

/// A control that can hold keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Text(TextField),
    Choice(ChoiceField),
    Set(SetField),
    /// One entry of an ordered list
    ListItem(ListField, usize),
}

/// Focusable controls of `section`, in display order.
///
/// The "Other" elaboration only appears while "Other" is selected.
pub fn targets(section: Section, fields: &FieldStore) -> Vec<FocusTarget> {
    let mut out = Vec::new();
    for question in section.questions() {
        match question.field {
            FieldRef::Text(TextField::FeedbackStopsOther) if !fields.wants_other_detail() => {}
            FieldRef::Text(field) => out.push(FocusTarget::Text(field)),
            FieldRef::Choice(field) => out.push(FocusTarget::Choice(field)),
            FieldRef::Set(field) => out.push(FocusTarget::Set(field)),
            FieldRef::List(field) => {
                for i in 0..fields.list(field).len() {
                    out.push(FocusTarget::ListItem(field, i));
                }
            }
        }
    }
    out
}

/// Focused control index plus the option cursor inside choice lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusState {
    index: usize,
    option: usize,
}

impl FocusState {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Highlighted option of the focused choice or multi-select
    pub fn option(&self) -> usize {
        self.option
    }

    pub fn current(&self, targets: &[FocusTarget]) -> Option<FocusTarget> {
        targets.get(self.index).copied()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.index = (self.index + 1) % len;
            self.option = 0;
        }
    }

    pub fn prev(&mut self, len: usize) {
        if len > 0 {
            self.index = (self.index + len - 1) % len;
            self.option = 0;
        }
    }

    /// Keep the index valid after the target list shrank
    pub fn clamp(&mut self, len: usize) {
        if self.index >= len {
            self.index = len.saturating_sub(1);
        }
    }

    /// Focus `target` if it is present
    pub fn focus(&mut self, targets: &[FocusTarget], target: FocusTarget) {
        if let Some(pos) = targets.iter().position(|t| *t == target) {
            self.index = pos;
            self.option = 0;
        }
    }

    pub fn option_up(&mut self) {
        self.option = self.option.saturating_sub(1);
    }

    pub fn option_down(&mut self, count: usize) {
        if self.option + 1 < count {
            self.option += 1;
        }
    }

    /// Place the option cursor, clamped to `count`
    pub fn set_option(&mut self, option: usize, count: usize) {
        self.option = option.min(count.saturating_sub(1));
    }
}
