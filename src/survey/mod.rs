//! Survey model: answers, options, and section flow

pub mod fields;
pub mod options;
pub mod response;
pub mod sections;

pub use fields::{ChoiceField, FieldStore, ListField, SetField, TextField};
pub use options::{
    ChoiceOption, FeedbackComfort, FeedbackReceived, FeedbackStop, SadhanaRegularity,
    ToolsEnhancing,
};
pub use response::{PartialResponse, Prefill, SurveyResponse};
pub use sections::{
    FieldRef, Question, Section, SectionProgress, SectionSequencer, Transition, ValidationError,
};
