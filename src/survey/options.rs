//! Enumerated answer options for the single- and multi-choice questions
//!
//! Each option serializes as its display label so drafts, CSV rows and the
//! HTTP payload all carry the same human-readable text.

use serde::{Deserialize, Deserializer, Serialize};

/// A fixed, ordered list of answer options
pub trait ChoiceOption: Copy + Eq + Sized + 'static {
    /// All options in display order
    const ALL: &'static [Self];

    /// Human-readable label (also the serialized value)
    fn label(&self) -> &'static str;

    /// Position of this option in [`ChoiceOption::ALL`]
    fn index(&self) -> usize {
        Self::ALL.iter().position(|o| o == self).unwrap_or(0)
    }

    /// Option at `index`, if in range
    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse a label; unknown labels yield `None`
    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|o| o.label() == label)
    }

    /// Labels of all options in display order
    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|o| o.label()).collect()
    }
}

/// How comfortable the respondent is giving peers direct feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackComfort {
    #[serde(rename = "Very comfortable")]
    VeryComfortable,
    #[serde(rename = "Somewhat comfortable")]
    SomewhatComfortable,
    #[serde(rename = "Neutral / unsure")]
    Neutral,
    #[serde(rename = "Somewhat uncomfortable")]
    SomewhatUncomfortable,
    #[serde(rename = "Very uncomfortable")]
    VeryUncomfortable,
}

impl ChoiceOption for FeedbackComfort {
    const ALL: &'static [Self] = &[
        Self::VeryComfortable,
        Self::SomewhatComfortable,
        Self::Neutral,
        Self::SomewhatUncomfortable,
        Self::VeryUncomfortable,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::VeryComfortable => "Very comfortable",
            Self::SomewhatComfortable => "Somewhat comfortable",
            Self::Neutral => "Neutral / unsure",
            Self::SomewhatUncomfortable => "Somewhat uncomfortable",
            Self::VeryUncomfortable => "Very uncomfortable",
        }
    }
}

/// What stops the respondent from giving feedback (multi-select)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackStop {
    #[serde(rename = "Unclear expectations")]
    UnclearExpectations,
    #[serde(rename = "Fear of conflict")]
    FearOfConflict,
    #[serde(rename = "Concern about relationships")]
    ConcernAboutRelationships,
    #[serde(rename = "Lack of skill or language")]
    LackOfSkill,
    #[serde(rename = "Power dynamics")]
    PowerDynamics,
    #[serde(rename = "Time or context")]
    TimeOrContext,
    #[serde(rename = "Nothing—this isn't an issue for me")]
    NotAnIssue,
    #[serde(rename = "Other")]
    Other,
}

impl ChoiceOption for FeedbackStop {
    const ALL: &'static [Self] = &[
        Self::UnclearExpectations,
        Self::FearOfConflict,
        Self::ConcernAboutRelationships,
        Self::LackOfSkill,
        Self::PowerDynamics,
        Self::TimeOrContext,
        Self::NotAnIssue,
        Self::Other,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::UnclearExpectations => "Unclear expectations",
            Self::FearOfConflict => "Fear of conflict",
            Self::ConcernAboutRelationships => "Concern about relationships",
            Self::LackOfSkill => "Lack of skill or language",
            Self::PowerDynamics => "Power dynamics",
            Self::TimeOrContext => "Time or context",
            Self::NotAnIssue => "Nothing—this isn't an issue for me",
            Self::Other => "Other",
        }
    }
}

/// How peer feedback usually reaches the respondent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackReceived {
    #[serde(rename = "In the moment")]
    InTheMoment,
    #[serde(rename = "In 1:1s")]
    InOneOnOnes,
    #[serde(rename = "Through managers")]
    ThroughManagers,
    #[serde(rename = "Retrospectives")]
    Retrospectives,
    #[serde(rename = "Rarely or never")]
    RarelyOrNever,
}

impl ChoiceOption for FeedbackReceived {
    const ALL: &'static [Self] = &[
        Self::InTheMoment,
        Self::InOneOnOnes,
        Self::ThroughManagers,
        Self::Retrospectives,
        Self::RarelyOrNever,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::InTheMoment => "In the moment",
            Self::InOneOnOnes => "In 1:1s",
            Self::ThroughManagers => "Through managers",
            Self::Retrospectives => "Retrospectives",
            Self::RarelyOrNever => "Rarely or never",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolsEnhancing {
    Yes,
    No,
    #[serde(rename = "Not Really")]
    NotReally,
}

impl ChoiceOption for ToolsEnhancing {
    const ALL: &'static [Self] = &[Self::Yes, Self::No, Self::NotReally];

    fn label(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::NotReally => "Not Really",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SadhanaRegularity {
    #[serde(rename = "Happens almost everyday")]
    AlmostEveryday,
    #[serde(rename = "Happens sometimes - on and off")]
    Sometimes,
    #[serde(rename = "Not really happening")]
    NotHappening,
    #[serde(rename = "Not applicable to me")]
    NotApplicable,
}

impl ChoiceOption for SadhanaRegularity {
    const ALL: &'static [Self] = &[
        Self::AlmostEveryday,
        Self::Sometimes,
        Self::NotHappening,
        Self::NotApplicable,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::AlmostEveryday => "Happens almost everyday",
            Self::Sometimes => "Happens sometimes - on and off",
            Self::NotHappening => "Not really happening",
            Self::NotApplicable => "Not applicable to me",
        }
    }
}

/// Deserialize a present-but-possibly-unknown option label.
///
/// Missing keys stay `None` (via `#[serde(default)]`), a present key always
/// yields `Some(_)`: `Some(None)` for null, empty or unrecognized labels.
pub(crate) fn lenient_choice<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: ChoiceOption,
{
    lenient_option(deserializer).map(Some)
}

/// Deserialize an option label, treating null, empty or unknown labels as
/// unanswered
pub(crate) fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: ChoiceOption,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(T::from_label))
}

/// Like [`lenient_choice_list`], but null becomes an empty selection
pub(crate) fn lenient_labels<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: ChoiceOption,
{
    lenient_choice_list(deserializer).map(Option::unwrap_or_default)
}

/// Deserialize a list of option labels, skipping unknown ones
pub(crate) fn lenient_choice_list<'de, D, T>(
    deserializer: D,
) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: ChoiceOption,
{
    let raw = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(raw.map(|labels| {
        labels
            .iter()
            .filter_map(|label| T::from_label(label))
            .collect()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_serde_names() {
        for stop in FeedbackStop::ALL {
            let json = serde_json::to_string(stop).unwrap();
            assert_eq!(json, format!("\"{}\"", stop.label()));
        }
        for comfort in FeedbackComfort::ALL {
            let json = serde_json::to_string(comfort).unwrap();
            assert_eq!(json, format!("\"{}\"", comfort.label()));
        }
    }

    #[test]
    fn test_index_round_trips() {
        for (i, option) in SadhanaRegularity::ALL.iter().enumerate() {
            assert_eq!(option.index(), i);
            assert_eq!(SadhanaRegularity::from_index(i), Some(*option));
        }
        assert_eq!(ToolsEnhancing::from_index(3), None);
    }

    #[test]
    fn test_from_label_unknown() {
        assert_eq!(FeedbackReceived::from_label("In 1:1s"), Some(FeedbackReceived::InOneOnOnes));
        assert_eq!(FeedbackReceived::from_label("Carrier pigeon"), None);
        assert_eq!(FeedbackReceived::from_label(""), None);
    }
}
