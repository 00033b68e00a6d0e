//! Mock save backend for deterministic testing
//!
//! Records every response it is asked to save and can be configured to
//! fail or to hold each save until released, so tests can observe the
//! wizard while a submission is in flight.
//!
//! # Example
//! ```no_run
//! use lookback::submit::mock::MockBackend;
//! use lookback::submit::Capability;
//!
//! let backend = MockBackend::new("mock", Capability::AppendRow).gated();
//! // ... start a submission, inspect state ...
//! backend.release();
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use super::backend::{require_identity, BackendError, Capability, SaveBackend, SaveReceipt};
use crate::survey::SurveyResponse;

#[derive(Clone)]
pub struct MockBackend {
    name: String,
    capability: Capability,
    /// Error message returned by every save while set
    failure: Arc<Mutex<Option<String>>>,
    /// Saves wait for a permit when present
    gate: Option<Arc<Semaphore>>,
    calls: Arc<AtomicUsize>,
    saved: Arc<Mutex<Vec<SurveyResponse>>>,
}

impl MockBackend {
    pub fn new(name: impl Into<String>, capability: Capability) -> Self {
        Self {
            name: name.into(),
            capability,
            failure: Arc::new(Mutex::new(None)),
            gate: None,
            calls: Arc::new(AtomicUsize::new(0)),
            saved: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A backend whose saves fail with `message`
    pub fn failing(name: impl Into<String>, capability: Capability, message: &str) -> Self {
        let backend = Self::new(name, capability);
        backend.set_failure(Some(message));
        backend
    }

    /// Hold every save until [`MockBackend::release`] is called
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Let one held save proceed
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.lock() = message.map(str::to_string);
    }

    /// Number of save calls, including failed ones
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Responses that were saved successfully
    pub fn saved(&self) -> Vec<SurveyResponse> {
        self.saved.lock().clone()
    }
}

#[async_trait]
impl SaveBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> Capability {
        self.capability
    }

    async fn save(&self, response: &SurveyResponse) -> Result<SaveReceipt, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| BackendError::Unavailable("mock gate closed".to_string()))?;
            permit.forget();
        }

        require_identity(response)?;

        if let Some(message) = self.failure.lock().clone() {
            return Err(BackendError::Unavailable(message));
        }

        self.saved.lock().push(response.clone());
        Ok(SaveReceipt::new(&self.name, "Response saved"))
    }
}
