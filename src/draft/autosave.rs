//! Autosave controller
//!
//! Keeps the draft store in sync with the answers and the section cursor.
//! Section changes, blur and unload persist immediately; edits are batched
//! behind a quiescence window. Every failure is logged and swallowed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use super::snapshot::{DraftSnapshot, SavedDraft};
use super::store::{DraftError, DraftStore};
use crate::survey::SurveyResponse;

/// Timing and key settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutosaveSettings {
    /// Storage key of the draft
    pub key: String,
    /// Quiet period after the last edit before a debounced save
    pub debounce: Duration,
    /// Suppression window after hydrating from a draft
    pub grace: Duration,
}

impl Default for AutosaveSettings {
    fn default() -> Self {
        Self {
            key: super::snapshot::DEFAULT_DRAFT_KEY.to_string(),
            debounce: Duration::from_millis(2000),
            grace: Duration::from_millis(500),
        }
    }
}

pub struct AutosaveController {
    store: Arc<dyn DraftStore>,
    settings: AutosaveSettings,
    loaded: bool,
    suppress_until: Option<Instant>,
    pending: Option<Instant>,
    last_saved: Option<DateTime<Utc>>,
}

impl AutosaveController {
    pub fn new(store: Arc<dyn DraftStore>, settings: AutosaveSettings) -> Self {
        Self {
            store,
            settings,
            loaded: false,
            suppress_until: None,
            pending: None,
            last_saved: None,
        }
    }

    pub fn settings(&self) -> &AutosaveSettings {
        &self.settings
    }

    /// Timestamp of the last successful save (or of the loaded draft)
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    /// Whether a debounced save is waiting
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Read the saved draft. Only the first call does anything.
    ///
    /// A present draft opens the grace window so freshly loaded data is not
    /// immediately written back as if it were a new edit.
    pub fn load(&mut self, now: Instant) -> Option<SavedDraft> {
        if self.loaded {
            return None;
        }
        self.loaded = true;

        let raw = match self.store.read(&self.settings.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load saved form data");
                return None;
            }
        };

        match SavedDraft::parse(&raw) {
            Ok(draft) => {
                self.last_saved = draft.last_saved;
                self.suppress_until = Some(now + self.settings.grace);
                tracing::debug!(
                    section = ?draft.current_section,
                    saved_at = ?draft.last_saved,
                    "Loaded saved draft"
                );
                Some(draft)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Saved draft is unreadable, ignoring it");
                None
            }
        }
    }

    pub fn is_suppressed(&self, now: Instant) -> bool {
        self.suppress_until.is_some_and(|until| now < until)
    }

    /// Write the snapshot right away. Returns whether it was written.
    pub fn persist_now(&mut self, now: Instant, response: &SurveyResponse, section: usize) -> bool {
        if self.is_suppressed(now) {
            return false;
        }
        self.pending = None;

        let saved_at = Utc::now();
        match self.write(response, section, saved_at) {
            Ok(()) => {
                self.last_saved = Some(saved_at);
                true
            }
            Err(DraftError::Unavailable(reason)) => {
                tracing::debug!(%reason, "Autosave skipped");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save form data");
                false
            }
        }
    }

    /// Schedule a debounced save after an edit; each edit restarts the window
    pub fn schedule(&mut self, now: Instant) {
        if self.is_suppressed(now) {
            return;
        }
        self.pending = Some(now + self.settings.debounce);
    }

    /// Whether the debounced save is due
    pub fn is_due(&self, now: Instant) -> bool {
        self.pending.is_some_and(|deadline| now >= deadline)
    }

    /// Perform the debounced save if its window has elapsed
    pub fn flush_due(&mut self, now: Instant, response: &SurveyResponse, section: usize) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.pending = None;
        self.persist_now(now, response, section)
    }

    /// Drop any pending debounced save
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Delete the draft after a confirmed submission
    pub fn clear(&mut self) {
        self.pending = None;
        if let Err(e) = self.store.remove(&self.settings.key) {
            tracing::warn!(error = %e, "Failed to clear saved form data");
        }
        self.last_saved = None;
    }

    fn write(
        &self,
        response: &SurveyResponse,
        section: usize,
        saved_at: DateTime<Utc>,
    ) -> Result<(), DraftError> {
        let snapshot = DraftSnapshot {
            form_data: response,
            current_section: section,
            last_saved: saved_at,
        };
        let raw = serde_json::to_string(&snapshot)?;
        self.store.write(&self.settings.key, &raw)
    }
}
