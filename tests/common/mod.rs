//! Shared test utilities
//!
//! - Wizard construction over arbitrary draft stores and backends
//! - TUI terminal testing helpers

pub mod terminal;

use std::sync::Arc;
use std::time::Instant;

use lookback::draft::{AutosaveController, AutosaveSettings, DraftStore};
use lookback::submit::SaveBackend;
use lookback::survey::{Prefill, SurveyResponse, TextField};
use lookback::{SubmissionCoordinator, Wizard};

/// A mounted wizard over `store` and `backend`
pub fn mounted_wizard(
    store: Arc<dyn DraftStore>,
    backend: Arc<dyn SaveBackend>,
    now: Instant,
) -> Wizard {
    let autosave = AutosaveController::new(store, AutosaveSettings::default());
    let coordinator = Arc::new(SubmissionCoordinator::new(backend));
    let mut wizard = Wizard::new(autosave, coordinator);
    wizard.mount(&Prefill::default(), now);
    wizard
}

/// Leave the welcome screen and fill name and email
pub fn start_with_identity(wizard: &mut Wizard, now: Instant, name: &str, email: &str) {
    wizard.begin();
    wizard.set_text(now, TextField::Name, name);
    wizard.set_text(now, TextField::Email, email);
}

pub fn walk_to_review(wizard: &mut Wizard, now: Instant) {
    while !wizard.is_final_section() {
        wizard.advance(now).expect("identity should be filled");
    }
}

/// A response with identity and a few answers
pub fn sample_response(name: &str) -> SurveyResponse {
    SurveyResponse {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        role: "Engineer".to_string(),
        proud_of: vec!["Shipped the thing".to_string(), "Mentored, a lot".to_string()],
        learned: "Line one\nLine two".to_string(),
        ..Default::default()
    }
}
