//! Ordered fallback over several backends

use std::sync::Arc;

use async_trait::async_trait;

use super::backend::{AttemptFailure, BackendError, Capability, SaveBackend, SaveReceipt};
use crate::survey::SurveyResponse;

/// Tries each backend in order until one succeeds
pub struct FallbackChain {
    backends: Vec<Arc<dyn SaveBackend>>,
}

impl FallbackChain {
    pub fn new(backends: Vec<Arc<dyn SaveBackend>>) -> Self {
        Self { backends }
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn backends(&self) -> &[Arc<dyn SaveBackend>] {
        &self.backends
    }
}

#[async_trait]
impl SaveBackend for FallbackChain {
    fn name(&self) -> &str {
        "chain"
    }

    /// The capability of the preferred backend
    fn capability(&self) -> Capability {
        self.backends
            .first()
            .map(|b| b.capability())
            .unwrap_or(Capability::Forward)
    }

    async fn save(&self, response: &SurveyResponse) -> Result<SaveReceipt, BackendError> {
        let mut failures = Vec::new();

        for backend in &self.backends {
            match backend.save(response).await {
                Ok(receipt) => {
                    if !failures.is_empty() {
                        tracing::info!(
                            backend = backend.name(),
                            skipped = failures.len(),
                            "Saved with fallback backend"
                        );
                    }
                    return Ok(receipt);
                }
                // Every backend would reject it the same way
                Err(BackendError::MissingIdentity) => return Err(BackendError::MissingIdentity),
                Err(e) => {
                    tracing::warn!(
                        backend = backend.name(),
                        capability = %backend.capability(),
                        error = %e,
                        "Backend failed, trying next"
                    );
                    failures.push(AttemptFailure {
                        backend: backend.name().to_string(),
                        capability: backend.capability(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Err(BackendError::Exhausted(failures))
    }
}
