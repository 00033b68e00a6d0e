//! Survey response entity

use serde::{Deserialize, Serialize};

use super::options::{
    lenient_choice, lenient_choice_list, lenient_labels, lenient_option, FeedbackComfort,
    FeedbackReceived, FeedbackStop, SadhanaRegularity, ToolsEnhancing,
};

/// A complete (or in-progress) survey response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyResponse {
    pub name: String,
    pub email: String,
    pub role: String,
    pub product: String,

    // Looking back
    pub proud_of: Vec<String>,
    pub meaningful_impact: String,

    // Friction
    pub struggles: String,
    pub work_harder: String,

    // Growth
    pub learned: String,
    pub growth_unsupported: String,

    // Peers
    #[serde(deserialize_with = "lenient_option")]
    pub feedback_comfort: Option<FeedbackComfort>,
    pub feedback_comfort_reason: String,
    #[serde(deserialize_with = "lenient_labels")]
    pub feedback_stops: Vec<FeedbackStop>,
    pub feedback_stops_other: String,
    #[serde(deserialize_with = "lenient_option")]
    pub feedback_received: Option<FeedbackReceived>,
    pub feedback_received_reason: String,
    pub feedback_easier: String,

    // Leadership
    pub leadership_value: String,
    pub leadership_different: String,

    // Inner growth
    #[serde(deserialize_with = "lenient_option")]
    pub tools_enhancing: Option<ToolsEnhancing>,
    #[serde(deserialize_with = "lenient_option")]
    pub sadhana_regularity: Option<SadhanaRegularity>,
    pub inner_growth_support: String,

    // Looking ahead
    pub great_year: String,
    pub anything_else: String,
}

impl Default for SurveyResponse {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: String::new(),
            product: String::new(),
            // One empty slot invites the first entry
            proud_of: vec![String::new()],
            meaningful_impact: String::new(),
            struggles: String::new(),
            work_harder: String::new(),
            learned: String::new(),
            growth_unsupported: String::new(),
            feedback_comfort: None,
            feedback_comfort_reason: String::new(),
            feedback_stops: Vec::new(),
            feedback_stops_other: String::new(),
            feedback_received: None,
            feedback_received_reason: String::new(),
            feedback_easier: String::new(),
            leadership_value: String::new(),
            leadership_different: String::new(),
            tools_enhancing: None,
            sadhana_regularity: None,
            inner_growth_support: String::new(),
            great_year: String::new(),
            anything_else: String::new(),
        }
    }
}

impl SurveyResponse {
    /// Names of required identity fields that are blank
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        missing
    }

    /// Whether name and email are both filled in
    pub fn has_identity(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Copy prepared for submission.
    ///
    /// Blank "proud of" entries are dropped and the "Other" elaboration is
    /// cleared unless "Other" is selected.
    pub fn finalized(&self) -> Self {
        let mut out = self.clone();
        out.proud_of.retain(|item| !item.trim().is_empty());
        if !out.feedback_stops.contains(&FeedbackStop::Other) {
            out.feedback_stops_other.clear();
        }
        out
    }

    /// Name to greet the respondent with
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "there"
        } else {
            self.name.trim()
        }
    }
}

/// A permissively-parsed response where every key is optional.
///
/// Used for autosaved drafts: a missing key leaves the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialResponse {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub product: Option<String>,
    pub proud_of: Option<Vec<String>>,
    pub meaningful_impact: Option<String>,
    pub struggles: Option<String>,
    pub work_harder: Option<String>,
    pub learned: Option<String>,
    pub growth_unsupported: Option<String>,
    #[serde(deserialize_with = "lenient_choice")]
    pub feedback_comfort: Option<Option<FeedbackComfort>>,
    pub feedback_comfort_reason: Option<String>,
    #[serde(deserialize_with = "lenient_choice_list")]
    pub feedback_stops: Option<Vec<FeedbackStop>>,
    pub feedback_stops_other: Option<String>,
    #[serde(deserialize_with = "lenient_choice")]
    pub feedback_received: Option<Option<FeedbackReceived>>,
    pub feedback_received_reason: Option<String>,
    pub feedback_easier: Option<String>,
    pub leadership_value: Option<String>,
    pub leadership_different: Option<String>,
    #[serde(deserialize_with = "lenient_choice")]
    pub tools_enhancing: Option<Option<ToolsEnhancing>>,
    #[serde(deserialize_with = "lenient_choice")]
    pub sadhana_regularity: Option<Option<SadhanaRegularity>>,
    pub inner_growth_support: Option<String>,
    pub great_year: Option<String>,
    pub anything_else: Option<String>,
}

/// Values supplied by the caller before the wizard starts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefill {
    pub name: Option<String>,
    pub role: Option<String>,
    pub product: Option<String>,
}

impl Prefill {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.role.is_none() && self.product.is_none()
    }
}
