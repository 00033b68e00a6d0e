pub mod config;
pub mod draft;
pub mod submit;
pub mod survey;
pub mod ui;
pub mod util;
pub mod web;
pub mod wizard;

pub use config::Config;
pub use draft::{AutosaveController, DraftStore, FileDraftStore};
pub use submit::{SaveBackend, SubmissionCoordinator};
pub use survey::{FieldStore, Section, SectionSequencer, SurveyResponse};
pub use ui::App;
pub use wizard::{Wizard, WizardPhase};
