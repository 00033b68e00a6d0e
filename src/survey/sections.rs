//! Ordered survey sections and the cursor that walks them

use thiserror::Error;

use super::fields::{ChoiceField, ListField, SetField, TextField};
use super::response::SurveyResponse;

/// A field rendered by a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef {
    Text(TextField),
    Choice(ChoiceField),
    List(ListField),
    Set(SetField),
}

/// One prompt within a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub prompt: &'static str,
    pub field: FieldRef,
    pub required: bool,
}

const fn ask(prompt: &'static str, field: FieldRef) -> Question {
    Question {
        prompt,
        field,
        required: false,
    }
}

const fn require(prompt: &'static str, field: FieldRef) -> Question {
    Question {
        prompt,
        field,
        required: true,
    }
}

use FieldRef::{Choice, List, Set, Text};

const BASIC_INFO: &[Question] = &[
    require("Name", Text(TextField::Name)),
    require("Email", Text(TextField::Email)),
    ask("Role", Text(TextField::Role)),
    ask("Product Area / Team", Text(TextField::Product)),
];

const LOOKING_BACK: &[Question] = &[
    ask(
        "What are you most proud of from this year?",
        List(ListField::ProudOf),
    ),
    ask(
        "What work of yours had a meaningful impact but may not be very visible?",
        Text(TextField::MeaningfulImpact),
    ),
];

const FRICTION: &[Question] = &[
    ask("What did you struggle with?", Text(TextField::Struggles)),
    ask(
        "What made your work harder than it needed to be this year?",
        Text(TextField::WorkHarder),
    ),
];

const GROWTH: &[Question] = &[
    ask(
        "What did you personally learn or get better at this year?",
        Text(TextField::Learned),
    ),
    ask(
        "In which area(s) do you aspire to grow next year, and feel under-supported today?",
        Text(TextField::GrowthUnsupported),
    ),
];

const PEERS: &[Question] = &[
    ask(
        "How comfortable do you feel giving direct, constructive feedback to peers when something isn't working?",
        Choice(ChoiceField::FeedbackComfort),
    ),
    ask(
        "What makes it easier or harder? (Optional)",
        Text(TextField::FeedbackComfortReason),
    ),
    ask(
        "What typically stops you from giving feedback to a peer when you feel it's needed?",
        Set(SetField::FeedbackStops),
    ),
    ask("Please specify", Text(TextField::FeedbackStopsOther)),
    ask(
        "When peers give you feedback, how does it usually happen today?",
        Choice(ChoiceField::FeedbackReceived),
    ),
    ask(
        "Anything you'd like to add? (Optional)",
        Text(TextField::FeedbackReceivedReason),
    ),
    ask(
        "What would make it easier or safer for you to give and receive peer feedback next year?",
        Text(TextField::FeedbackEasier),
    ),
];

const LEADERSHIP: &[Question] = &[
    ask(
        "What is the one thing I / your immediate lead are doing that adds most value to you and your work, and should continue doing?",
        Text(TextField::LeadershipValue),
    ),
    ask(
        "What are the few things I / your immediate lead could do differently to help you do your best work?",
        Text(TextField::LeadershipDifferent),
    ),
];

const INNER_GROWTH: &[Question] = &[
    ask(
        "Are aspects of this space and the tools that Sadhguru offers enhancing your life?",
        Choice(ChoiceField::ToolsEnhancing),
    ),
    ask(
        "How regular are you with your Sadhana?",
        Choice(ChoiceField::SadhanaRegularity),
    ),
    ask(
        "Any support you would like on this aspect?",
        Text(TextField::InnerGrowthSupport),
    ),
];

const LOOKING_AHEAD: &[Question] = &[
    ask(
        "If next year were a great year for you, what would be meaningfully different?",
        Text(TextField::GreatYear),
    ),
    ask("Anything else?", Text(TextField::AnythingElse)),
];

/// Wizard sections in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    BasicInfo,
    Welcome,
    LookingBack,
    Friction,
    Growth,
    Peers,
    Leadership,
    InnerGrowth,
    LookingAhead,
    Review,
}

impl Section {
    pub const ALL: [Section; 10] = [
        Section::BasicInfo,
        Section::Welcome,
        Section::LookingBack,
        Section::Friction,
        Section::Growth,
        Section::Peers,
        Section::Leadership,
        Section::InnerGrowth,
        Section::LookingAhead,
        Section::Review,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn at(index: usize) -> Section {
        Self::ALL[index.min(Self::COUNT - 1)]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::BasicInfo => "Basic Info",
            Section::Welcome => "Welcome",
            Section::LookingBack => "Looking Back on the Year",
            Section::Friction => "Friction, Struggles, and Constraints",
            Section::Growth => "Growth and Development",
            Section::Peers => "Working with Peers",
            Section::Leadership => "Leadership Support & Feedback",
            Section::InnerGrowth => "Inner Growth",
            Section::LookingAhead => "Looking Ahead",
            Section::Review => "Final",
        }
    }

    /// Subtitle shown under the section title
    pub fn tagline(&self) -> &'static str {
        match self {
            Section::BasicInfo => "Let's start with some basic information",
            Section::Welcome => "",
            Section::LookingBack => "Reflect on your achievements and impact",
            Section::Friction => "Share what challenged you",
            Section::Growth => "Think about your growth journey",
            Section::Peers => "Reflect on peer relationships",
            Section::Leadership => "Share feedback for leadership",
            Section::InnerGrowth => "Reflect on your inner growth journey",
            Section::LookingAhead => "Envision your future",
            Section::Review => "Review and submit",
        }
    }

    pub fn quote(&self) -> Option<&'static str> {
        match self {
            Section::LookingBack => Some(
                "It's not the amount of action but the depth of experience that makes life rich and fulfilling.",
            ),
            Section::Friction => {
                Some("If you turn inward, you will find a space where there is a solution for everything.")
            }
            Section::Growth => Some(
                "Anything you do willingly will become a great pleasure and a process of growth for you.",
            ),
            Section::Peers => Some(
                "If you think everyone is out to get you, you will become small. Trust is important.",
            ),
            Section::InnerGrowth => {
                Some("Success will come easy once you function at your full potential.")
            }
            Section::LookingAhead => Some(
                "It is good to have a plan, but it is more important to have a purpose. If you have a purpose, plan will evolve and manifest.",
            ),
            _ => None,
        }
    }

    /// Introductory sections are not counted in progress and never validated
    pub fn is_intro(&self) -> bool {
        matches!(self, Section::Welcome)
    }

    /// Whether leaving this section requires name and email
    pub fn requires_identity(&self) -> bool {
        matches!(self, Section::BasicInfo)
    }

    pub fn is_review(&self) -> bool {
        matches!(self, Section::Review)
    }

    pub fn questions(&self) -> &'static [Question] {
        match self {
            Section::BasicInfo => BASIC_INFO,
            Section::Welcome | Section::Review => &[],
            Section::LookingBack => LOOKING_BACK,
            Section::Friction => FRICTION,
            Section::Growth => GROWTH,
            Section::Peers => PEERS,
            Section::Leadership => LEADERSHIP,
            Section::InnerGrowth => INNER_GROWTH,
            Section::LookingAhead => LOOKING_AHEAD,
        }
    }
}

/// Required fields are missing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill in your name and email before continuing.")]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

impl ValidationError {
    pub fn check(response: &SurveyResponse) -> Result<(), ValidationError> {
        let missing = response.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }
}

/// Result of a successful navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Section,
    pub to: Section,
}

impl Transition {
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// Progress display derived from the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionProgress {
    /// 1-based position, intro excluded
    pub position: usize,
    /// Number of counted sections
    pub total: usize,
    pub percent: u8,
}

/// Linear cursor over [`Section::ALL`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionSequencer {
    index: usize,
}

impl SectionSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Section {
        Section::at(self.index)
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_terminal(&self) -> bool {
        self.index == Section::COUNT - 1
    }

    /// Jump to a saved cursor, clamped into range
    pub fn restore(&mut self, index: usize) {
        self.index = index.min(Section::COUNT - 1);
    }

    /// Move forward one section.
    ///
    /// Refused while the current section requires identity and name or email
    /// is blank. At the last section the cursor stays put.
    pub fn advance(&mut self, response: &SurveyResponse) -> Result<Transition, ValidationError> {
        let from = self.current();
        if from.requires_identity() {
            ValidationError::check(response)?;
        }
        self.index = (self.index + 1).min(Section::COUNT - 1);
        Ok(Transition {
            from,
            to: self.current(),
        })
    }

    /// Move back one section; never gated
    pub fn retreat(&mut self) -> Transition {
        let from = self.current();
        self.index = self.index.saturating_sub(1);
        Transition {
            from,
            to: self.current(),
        }
    }

    pub fn progress(&self) -> SectionProgress {
        let position = if self.index > 1 {
            self.index - 1
        } else {
            self.index
        };
        let total = Section::COUNT - 1;
        let percent = ((position as f64 / total as f64) * 100.0).round() as u8;
        SectionProgress {
            position: position + 1,
            total,
            percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn identified() -> SurveyResponse {
        SurveyResponse {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sections_are_indexed_in_order() {
        for (i, section) in Section::ALL.iter().enumerate() {
            assert_eq!(section.index(), i);
            assert_eq!(Section::at(i), *section);
        }
        assert_eq!(Section::at(100), Section::Review);
    }

    #[test]
    fn test_advance_refused_without_identity() {
        let mut seq = SectionSequencer::new();
        let err = seq.advance(&SurveyResponse::default()).unwrap_err();
        assert_eq!(err.missing, vec!["name", "email"]);
        assert_eq!(seq.index(), 0);

        let whitespace = SurveyResponse {
            name: "Alice".into(),
            email: "   ".into(),
            ..Default::default()
        };
        assert!(seq.advance(&whitespace).is_err());
        assert_eq!(seq.index(), 0);
    }

    #[test]
    fn test_advance_with_identity() {
        let mut seq = SectionSequencer::new();
        let t = seq.advance(&identified()).unwrap();
        assert_eq!(t.from, Section::BasicInfo);
        assert_eq!(t.to, Section::Welcome);
        assert!(t.moved());
    }

    #[test]
    fn test_later_sections_are_not_gated() {
        let mut seq = SectionSequencer::new();
        seq.restore(1);
        // Blank identity is only checked on Basic Info
        let t = seq.advance(&SurveyResponse::default()).unwrap();
        assert_eq!(t.to, Section::LookingBack);
    }

    #[test]
    fn test_clamped_at_both_ends() {
        let mut seq = SectionSequencer::new();
        let t = seq.retreat();
        assert!(!t.moved());
        assert_eq!(seq.index(), 0);

        seq.restore(Section::COUNT - 1);
        assert!(seq.is_terminal());
        let t = seq.advance(&identified()).unwrap();
        assert!(!t.moved());
        assert_eq!(seq.current(), Section::Review);
    }

    #[test]
    fn test_restore_clamps() {
        let mut seq = SectionSequencer::new();
        seq.restore(42);
        assert_eq!(seq.index(), Section::COUNT - 1);
    }

    #[test]
    fn test_progress_skips_intro() {
        let mut seq = SectionSequencer::new();
        assert_eq!(
            seq.progress(),
            SectionProgress {
                position: 1,
                total: 9,
                percent: 0
            }
        );

        seq.restore(2);
        assert_eq!(seq.progress().position, 2);
        assert_eq!(seq.progress().percent, 11);

        seq.restore(Section::COUNT - 1);
        assert_eq!(seq.progress().position, 9);
        assert_eq!(seq.progress().percent, 89);
    }

    #[test]
    fn test_only_welcome_is_intro() {
        let intros: Vec<_> = Section::ALL.iter().filter(|s| s.is_intro()).collect();
        assert_eq!(intros, vec![&Section::Welcome]);
    }

    proptest! {
        #[test]
        fn prop_index_stays_in_range(moves in proptest::collection::vec(any::<(bool, bool)>(), 0..64)) {
            let mut seq = SectionSequencer::new();
            for (forward, with_identity) in moves {
                let response = if with_identity { identified() } else { SurveyResponse::default() };
                let before = seq.index();
                if forward {
                    if seq.advance(&response).is_err() {
                        prop_assert_eq!(seq.index(), before);
                    }
                } else {
                    seq.retreat();
                }
                prop_assert!(seq.index() < Section::COUNT);
            }
        }
    }
}
