//! Wizard lifecycle
//!
//! [`Wizard`] is the single owner of the answers, the section cursor, the
//! autosave controller and the submission coordinator. Front ends call into
//! it synchronously; the only asynchronous step is the backend save, which
//! [`Wizard::begin_submit`] hands back as a [`PendingSubmission`] so the
//! caller can run it wherever it likes and report back through
//! [`Wizard::finish_submit`].

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::draft::AutosaveController;
use crate::submit::{
    BackendError, PendingSubmission, SubmissionCoordinator, SubmitError, Submitted,
};
use crate::survey::{
    ChoiceField, FieldStore, ListField, Prefill, Section, SectionProgress, SectionSequencer,
    SetField, SurveyResponse, TextField, Transition, ValidationError,
};

/// Where the respondent is in the overall flow
#[derive(Debug, Clone)]
pub enum WizardPhase {
    Welcome,
    Editing,
    Submitting,
    /// Terminal; carries the finalized response
    Submitted(Submitted),
    /// The last submission failed; editing and resubmitting are allowed
    Failed { message: String },
}

impl WizardPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WizardPhase::Submitted(_))
    }
}

/// User-facing text for a failed submission
pub fn failure_message(error: &SubmitError) -> String {
    let detail = match error {
        SubmitError::Backend(BackendError::Remote { details, .. }) => details.clone(),
        other => other.to_string(),
    };
    format!("There was an error saving your response: {}", detail)
}

pub struct Wizard {
    fields: FieldStore,
    sequencer: SectionSequencer,
    autosave: AutosaveController,
    coordinator: Arc<SubmissionCoordinator>,
    phase: WizardPhase,
    mounted: bool,
    restored_draft: bool,
    validation: Option<ValidationError>,
}

impl Wizard {
    pub fn new(autosave: AutosaveController, coordinator: Arc<SubmissionCoordinator>) -> Self {
        Self {
            fields: FieldStore::new(),
            sequencer: SectionSequencer::new(),
            autosave,
            coordinator,
            phase: WizardPhase::Welcome,
            mounted: false,
            restored_draft: false,
            validation: None,
        }
    }

    /// Apply caller defaults, then any saved draft. Only the first call
    /// has an effect.
    pub fn mount(&mut self, prefill: &Prefill, now: Instant) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.fields = FieldStore::with_prefill(prefill);

        if let Some(draft) = self.autosave.load(now) {
            if let Some(saved) = draft.form_data {
                self.fields.hydrate(saved);
            }
            if let Some(section) = draft.current_section {
                self.sequencer.restore(section);
            }
            self.restored_draft = true;
            tracing::info!(section = self.sequencer.index(), "Restored saved progress");
        }
    }

    /// Leave the welcome screen
    pub fn begin(&mut self) {
        if matches!(self.phase, WizardPhase::Welcome) {
            self.phase = WizardPhase::Editing;
        }
    }

    pub fn phase(&self) -> &WizardPhase {
        &self.phase
    }

    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    pub fn response(&self) -> &SurveyResponse {
        self.fields.response()
    }

    pub fn section(&self) -> Section {
        self.sequencer.current()
    }

    pub fn section_index(&self) -> usize {
        self.sequencer.index()
    }

    pub fn progress(&self) -> SectionProgress {
        self.sequencer.progress()
    }

    pub fn is_first_section(&self) -> bool {
        self.sequencer.is_first()
    }

    pub fn is_final_section(&self) -> bool {
        self.sequencer.is_terminal()
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.autosave.last_saved()
    }

    /// Whether mount found and applied a saved draft
    pub fn restored_draft(&self) -> bool {
        self.restored_draft
    }

    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.validation.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, WizardPhase::Submitting)
    }

    fn editable(&self) -> bool {
        matches!(
            self.phase,
            WizardPhase::Editing | WizardPhase::Submitting | WizardPhase::Failed { .. }
        )
    }

    /// Apply a mutation to the answers and schedule a debounced save
    fn edit(&mut self, now: Instant, f: impl FnOnce(&mut FieldStore)) {
        if !self.editable() {
            return;
        }
        f(&mut self.fields);
        self.autosave.schedule(now);
    }

    pub fn set_text(&mut self, now: Instant, field: TextField, value: impl Into<String>) {
        let value = value.into();
        self.edit(now, |fields| fields.set_text(field, value));
    }

    pub fn push_char(&mut self, now: Instant, field: TextField, c: char) {
        self.edit(now, |fields| fields.push_char(field, c));
    }

    pub fn pop_char(&mut self, now: Instant, field: TextField) {
        self.edit(now, |fields| fields.pop_char(field));
    }

    pub fn select_choice(&mut self, now: Instant, field: ChoiceField, index: usize) {
        self.edit(now, |fields| fields.select_choice(field, index));
    }

    pub fn toggle_set_member(&mut self, now: Instant, field: SetField, index: usize) {
        self.edit(now, |fields| fields.toggle_set_member(field, index));
    }

    pub fn append_list_item(&mut self, now: Instant, field: ListField) {
        self.edit(now, |fields| fields.append_list_item(field));
    }

    pub fn update_list_item(
        &mut self,
        now: Instant,
        field: ListField,
        index: usize,
        value: impl Into<String>,
    ) {
        let value = value.into();
        self.edit(now, |fields| fields.update_list_item(field, index, value));
    }

    pub fn push_list_char(&mut self, now: Instant, field: ListField, index: usize, c: char) {
        self.edit(now, |fields| fields.push_list_char(field, index, c));
    }

    pub fn pop_list_char(&mut self, now: Instant, field: ListField, index: usize) {
        self.edit(now, |fields| fields.pop_list_char(field, index));
    }

    pub fn remove_list_item(&mut self, now: Instant, field: ListField, index: usize) {
        self.edit(now, |fields| fields.remove_list_item(field, index));
    }

    fn persist(&mut self, now: Instant) -> bool {
        self.autosave
            .persist_now(now, self.fields.response(), self.sequencer.index())
    }

    /// A field lost focus
    pub fn blur(&mut self, now: Instant) {
        if self.editable() {
            self.persist(now);
        }
    }

    /// The front end is going away
    pub fn unload(&mut self, now: Instant) {
        self.autosave.cancel_pending();
        if !self.phase.is_terminal() && self.mounted {
            self.persist(now);
        }
    }

    /// Flush a debounced save whose window has elapsed
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.autosave
            .flush_due(now, self.fields.response(), self.sequencer.index())
    }

    fn after_navigation(&mut self, now: Instant, transition: Transition) {
        if let WizardPhase::Failed { .. } = self.phase {
            self.phase = WizardPhase::Editing;
        }
        if transition.moved() {
            self.persist(now);
        }
    }

    pub fn advance(&mut self, now: Instant) -> Result<Transition, ValidationError> {
        if !self.editable() {
            let here = self.sequencer.current();
            return Ok(Transition { from: here, to: here });
        }
        match self.sequencer.advance(self.fields.response()) {
            Ok(transition) => {
                self.validation = None;
                self.after_navigation(now, transition);
                Ok(transition)
            }
            Err(e) => {
                self.validation = Some(e.clone());
                Err(e)
            }
        }
    }

    pub fn retreat(&mut self, now: Instant) -> Transition {
        if !self.editable() {
            let here = self.sequencer.current();
            return Transition { from: here, to: here };
        }
        self.validation = None;
        let transition = self.sequencer.retreat();
        self.after_navigation(now, transition);
        transition
    }

    /// Accept a submission from the final section.
    ///
    /// Pending edits are written to the draft first. The returned
    /// submission owns everything it needs, so it can be run on another
    /// task; pass its outcome to [`Wizard::finish_submit`].
    pub fn begin_submit(&mut self, now: Instant) -> Result<PendingSubmission, SubmitError> {
        if !self.sequencer.is_terminal() || !self.editable() {
            return Err(SubmitError::OutOfSequence);
        }
        if self.autosave.has_pending() {
            self.persist(now);
        }

        match self.coordinator.start(self.fields.response()) {
            Ok(pending) => {
                self.validation = None;
                self.phase = WizardPhase::Submitting;
                Ok(pending)
            }
            Err(SubmitError::Validation(v)) => {
                self.validation = Some(v.clone());
                Err(SubmitError::Validation(v))
            }
            Err(e) => Err(e),
        }
    }

    /// Apply the outcome of a submission started with
    /// [`Wizard::begin_submit`], handing any error back to the caller
    pub fn finish_submit(
        &mut self,
        result: Result<Submitted, SubmitError>,
    ) -> Result<(), SubmitError> {
        match result {
            Ok(submitted) => {
                self.autosave.clear();
                tracing::info!(
                    backend = %submitted.receipt.backend,
                    "Survey submitted"
                );
                self.phase = WizardPhase::Submitted(submitted);
                Ok(())
            }
            Err(SubmitError::InFlight) => Err(SubmitError::InFlight),
            Err(e) => {
                self.phase = WizardPhase::Failed {
                    message: failure_message(&e),
                };
                Err(e)
            }
        }
    }

    /// Submit and wait for the outcome
    pub async fn submit(&mut self, now: Instant) -> Result<(), SubmitError> {
        let pending = self.begin_submit(now)?;
        let result = pending.run().await;
        self.finish_submit(result)
    }
}
