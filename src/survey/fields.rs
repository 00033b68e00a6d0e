//! In-memory answer state with typed mutation operations

use super::options::{
    ChoiceOption, FeedbackComfort, FeedbackReceived, FeedbackStop, SadhanaRegularity,
    ToolsEnhancing,
};
use super::response::{PartialResponse, Prefill, SurveyResponse};

/// Free-text scalar fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Name,
    Email,
    Role,
    Product,
    MeaningfulImpact,
    Struggles,
    WorkHarder,
    Learned,
    GrowthUnsupported,
    FeedbackComfortReason,
    FeedbackStopsOther,
    FeedbackReceivedReason,
    FeedbackEasier,
    LeadershipValue,
    LeadershipDifferent,
    InnerGrowthSupport,
    GreatYear,
    AnythingElse,
}

impl TextField {
    /// Whether the field is edited as a multi-line answer
    pub fn is_multiline(&self) -> bool {
        !matches!(
            self,
            TextField::Name | TextField::Email | TextField::Role | TextField::Product
        )
    }
}

/// Single-choice fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceField {
    FeedbackComfort,
    FeedbackReceived,
    ToolsEnhancing,
    SadhanaRegularity,
}

impl ChoiceField {
    /// Option labels in display order
    pub fn options(&self) -> Vec<&'static str> {
        match self {
            ChoiceField::FeedbackComfort => FeedbackComfort::labels(),
            ChoiceField::FeedbackReceived => FeedbackReceived::labels(),
            ChoiceField::ToolsEnhancing => ToolsEnhancing::labels(),
            ChoiceField::SadhanaRegularity => SadhanaRegularity::labels(),
        }
    }
}

/// Ordered free-text list fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListField {
    ProudOf,
}

/// Multi-select fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetField {
    FeedbackStops,
}

impl SetField {
    pub fn options(&self) -> Vec<&'static str> {
        match self {
            SetField::FeedbackStops => FeedbackStop::labels(),
        }
    }
}

/// Holds the answers of one respondent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldStore {
    response: SurveyResponse,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from caller-supplied defaults
    pub fn with_prefill(prefill: &Prefill) -> Self {
        let mut store = Self::new();
        if let Some(name) = &prefill.name {
            store.response.name = name.clone();
        }
        if let Some(role) = &prefill.role {
            store.response.role = role.clone();
        }
        if let Some(product) = &prefill.product {
            store.response.product = product.clone();
        }
        store
    }

    pub fn from_response(response: SurveyResponse) -> Self {
        let mut store = Self { response };
        store.ensure_list_slots();
        store
    }

    pub fn response(&self) -> &SurveyResponse {
        &self.response
    }

    pub fn into_response(self) -> SurveyResponse {
        self.response
    }

    pub fn text(&self, field: TextField) -> &str {
        let r = &self.response;
        match field {
            TextField::Name => &r.name,
            TextField::Email => &r.email,
            TextField::Role => &r.role,
            TextField::Product => &r.product,
            TextField::MeaningfulImpact => &r.meaningful_impact,
            TextField::Struggles => &r.struggles,
            TextField::WorkHarder => &r.work_harder,
            TextField::Learned => &r.learned,
            TextField::GrowthUnsupported => &r.growth_unsupported,
            TextField::FeedbackComfortReason => &r.feedback_comfort_reason,
            TextField::FeedbackStopsOther => &r.feedback_stops_other,
            TextField::FeedbackReceivedReason => &r.feedback_received_reason,
            TextField::FeedbackEasier => &r.feedback_easier,
            TextField::LeadershipValue => &r.leadership_value,
            TextField::LeadershipDifferent => &r.leadership_different,
            TextField::InnerGrowthSupport => &r.inner_growth_support,
            TextField::GreatYear => &r.great_year,
            TextField::AnythingElse => &r.anything_else,
        }
    }

    fn text_mut(&mut self, field: TextField) -> &mut String {
        let r = &mut self.response;
        match field {
            TextField::Name => &mut r.name,
            TextField::Email => &mut r.email,
            TextField::Role => &mut r.role,
            TextField::Product => &mut r.product,
            TextField::MeaningfulImpact => &mut r.meaningful_impact,
            TextField::Struggles => &mut r.struggles,
            TextField::WorkHarder => &mut r.work_harder,
            TextField::Learned => &mut r.learned,
            TextField::GrowthUnsupported => &mut r.growth_unsupported,
            TextField::FeedbackComfortReason => &mut r.feedback_comfort_reason,
            TextField::FeedbackStopsOther => &mut r.feedback_stops_other,
            TextField::FeedbackReceivedReason => &mut r.feedback_received_reason,
            TextField::FeedbackEasier => &mut r.feedback_easier,
            TextField::LeadershipValue => &mut r.leadership_value,
            TextField::LeadershipDifferent => &mut r.leadership_different,
            TextField::InnerGrowthSupport => &mut r.inner_growth_support,
            TextField::GreatYear => &mut r.great_year,
            TextField::AnythingElse => &mut r.anything_else,
        }
    }

    /// Overwrite a scalar text field. No validation happens here.
    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        *self.text_mut(field) = value.into();
    }

    /// Append a character to a text field
    pub fn push_char(&mut self, field: TextField, c: char) {
        self.text_mut(field).push(c);
    }

    /// Remove the last character of a text field
    pub fn pop_char(&mut self, field: TextField) {
        self.text_mut(field).pop();
    }

    /// Index of the selected option, if any
    pub fn choice_index(&self, field: ChoiceField) -> Option<usize> {
        let r = &self.response;
        match field {
            ChoiceField::FeedbackComfort => r.feedback_comfort.map(|o| o.index()),
            ChoiceField::FeedbackReceived => r.feedback_received.map(|o| o.index()),
            ChoiceField::ToolsEnhancing => r.tools_enhancing.map(|o| o.index()),
            ChoiceField::SadhanaRegularity => r.sadhana_regularity.map(|o| o.index()),
        }
    }

    /// Select the option at `index`; out-of-range indices are ignored
    pub fn select_choice(&mut self, field: ChoiceField, index: usize) {
        let r = &mut self.response;
        match field {
            ChoiceField::FeedbackComfort => {
                if let Some(option) = FeedbackComfort::from_index(index) {
                    r.feedback_comfort = Some(option);
                }
            }
            ChoiceField::FeedbackReceived => {
                if let Some(option) = FeedbackReceived::from_index(index) {
                    r.feedback_received = Some(option);
                }
            }
            ChoiceField::ToolsEnhancing => {
                if let Some(option) = ToolsEnhancing::from_index(index) {
                    r.tools_enhancing = Some(option);
                }
            }
            ChoiceField::SadhanaRegularity => {
                if let Some(option) = SadhanaRegularity::from_index(index) {
                    r.sadhana_regularity = Some(option);
                }
            }
        }
    }

    pub fn clear_choice(&mut self, field: ChoiceField) {
        let r = &mut self.response;
        match field {
            ChoiceField::FeedbackComfort => r.feedback_comfort = None,
            ChoiceField::FeedbackReceived => r.feedback_received = None,
            ChoiceField::ToolsEnhancing => r.tools_enhancing = None,
            ChoiceField::SadhanaRegularity => r.sadhana_regularity = None,
        }
    }

    pub fn list(&self, field: ListField) -> &[String] {
        match field {
            ListField::ProudOf => &self.response.proud_of,
        }
    }

    fn list_mut(&mut self, field: ListField) -> &mut Vec<String> {
        match field {
            ListField::ProudOf => &mut self.response.proud_of,
        }
    }

    /// Append an empty entry to an ordered list
    pub fn append_list_item(&mut self, field: ListField) {
        self.list_mut(field).push(String::new());
    }

    /// Replace the entry at `index`; out-of-range indices are ignored
    pub fn update_list_item(&mut self, field: ListField, index: usize, value: impl Into<String>) {
        if let Some(item) = self.list_mut(field).get_mut(index) {
            *item = value.into();
        }
    }

    pub fn push_list_char(&mut self, field: ListField, index: usize, c: char) {
        if let Some(item) = self.list_mut(field).get_mut(index) {
            item.push(c);
        }
    }

    pub fn pop_list_char(&mut self, field: ListField, index: usize) {
        if let Some(item) = self.list_mut(field).get_mut(index) {
            item.pop();
        }
    }

    /// Remove the entry at `index`.
    ///
    /// The list never ends up empty: removing the last entry leaves one blank
    /// slot behind for continued entry.
    pub fn remove_list_item(&mut self, field: ListField, index: usize) {
        let list = self.list_mut(field);
        if index < list.len() {
            list.remove(index);
        }
        if list.is_empty() {
            list.push(String::new());
        }
    }

    pub fn is_set_member(&self, field: SetField, index: usize) -> bool {
        match field {
            SetField::FeedbackStops => FeedbackStop::from_index(index)
                .is_some_and(|stop| self.response.feedback_stops.contains(&stop)),
        }
    }

    /// Toggle membership of the option at `index` in a multi-select field
    pub fn toggle_set_member(&mut self, field: SetField, index: usize) {
        match field {
            SetField::FeedbackStops => {
                let Some(stop) = FeedbackStop::from_index(index) else {
                    return;
                };
                let stops = &mut self.response.feedback_stops;
                if let Some(pos) = stops.iter().position(|s| *s == stop) {
                    stops.remove(pos);
                } else {
                    stops.push(stop);
                }
            }
        }
    }

    /// Whether the "Other" elaboration applies
    pub fn wants_other_detail(&self) -> bool {
        self.response.feedback_stops.contains(&FeedbackStop::Other)
    }

    /// Merge previously saved state into the current answers.
    ///
    /// Keys present in `saved` overwrite the current values. Name, role and
    /// product only overwrite when the saved value is non-empty, so defaults
    /// supplied by the caller fill the gaps a draft leaves behind.
    pub fn hydrate(&mut self, saved: PartialResponse) {
        fn keep_unless_empty(current: &mut String, saved: Option<String>) {
            if let Some(value) = saved.filter(|v| !v.is_empty()) {
                *current = value;
            }
        }
        fn overwrite<T>(current: &mut T, saved: Option<T>) {
            if let Some(value) = saved {
                *current = value;
            }
        }

        let r = &mut self.response;
        keep_unless_empty(&mut r.name, saved.name);
        keep_unless_empty(&mut r.role, saved.role);
        keep_unless_empty(&mut r.product, saved.product);

        overwrite(&mut r.email, saved.email);
        overwrite(&mut r.proud_of, saved.proud_of);
        overwrite(&mut r.meaningful_impact, saved.meaningful_impact);
        overwrite(&mut r.struggles, saved.struggles);
        overwrite(&mut r.work_harder, saved.work_harder);
        overwrite(&mut r.learned, saved.learned);
        overwrite(&mut r.growth_unsupported, saved.growth_unsupported);
        overwrite(&mut r.feedback_comfort, saved.feedback_comfort);
        overwrite(&mut r.feedback_comfort_reason, saved.feedback_comfort_reason);
        overwrite(&mut r.feedback_stops, saved.feedback_stops);
        overwrite(&mut r.feedback_stops_other, saved.feedback_stops_other);
        overwrite(&mut r.feedback_received, saved.feedback_received);
        overwrite(&mut r.feedback_received_reason, saved.feedback_received_reason);
        overwrite(&mut r.feedback_easier, saved.feedback_easier);
        overwrite(&mut r.leadership_value, saved.leadership_value);
        overwrite(&mut r.leadership_different, saved.leadership_different);
        overwrite(&mut r.tools_enhancing, saved.tools_enhancing);
        overwrite(&mut r.sadhana_regularity, saved.sadhana_regularity);
        overwrite(&mut r.inner_growth_support, saved.inner_growth_support);
        overwrite(&mut r.great_year, saved.great_year);
        overwrite(&mut r.anything_else, saved.anything_else);

        self.ensure_list_slots();
    }

    /// Response prepared for submission
    pub fn finalized(&self) -> SurveyResponse {
        self.response.finalized()
    }

    fn ensure_list_slots(&mut self) {
        if self.response.proud_of.is_empty() {
            self.response.proud_of.push(String::new());
        }
    }
}
