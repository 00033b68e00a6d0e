//! Submission coordinator
//!
//! Finalizes the answers, enforces the required fields, and issues exactly
//! one backend save per accepted submission. A second submission while one
//! is outstanding is rejected rather than queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use super::backend::{BackendError, SaveBackend, SaveReceipt};
use crate::survey::{SurveyResponse, ValidationError};

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("A submission is already in progress")]
    InFlight,
    #[error("Responses can only be submitted from the final section")]
    OutOfSequence,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// A confirmed save
#[derive(Debug, Clone)]
pub struct Submitted {
    /// The finalized response that was stored
    pub response: SurveyResponse,
    pub receipt: SaveReceipt,
}

/// Clears the in-flight flag when dropped
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct SubmissionCoordinator {
    backend: Arc<dyn SaveBackend>,
    in_flight: Arc<AtomicBool>,
}

impl SubmissionCoordinator {
    pub fn new(backend: Arc<dyn SaveBackend>) -> Self {
        Self {
            backend,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn backend(&self) -> &Arc<dyn SaveBackend> {
        &self.backend
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Accept a submission and take the in-flight guard.
    ///
    /// Validation runs on the finalized copy; nothing is sent to the
    /// backend until [`PendingSubmission::run`] is awaited.
    pub fn start(&self, response: &SurveyResponse) -> Result<PendingSubmission, SubmitError> {
        let response = response.finalized();
        ValidationError::check(&response)?;

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Submission rejected, another is in flight");
            return Err(SubmitError::InFlight);
        }

        Ok(PendingSubmission {
            backend: Arc::clone(&self.backend),
            response,
            _guard: InFlightGuard(Arc::clone(&self.in_flight)),
        })
    }

    /// Start and run in one step
    pub async fn submit(&self, response: &SurveyResponse) -> Result<Submitted, SubmitError> {
        self.start(response)?.run().await
    }
}

/// An accepted submission holding the in-flight guard
pub struct PendingSubmission {
    backend: Arc<dyn SaveBackend>,
    response: SurveyResponse,
    _guard: InFlightGuard,
}

impl PendingSubmission {
    pub fn response(&self) -> &SurveyResponse {
        &self.response
    }

    /// Issue the single save call; the guard is released on return
    pub async fn run(self) -> Result<Submitted, SubmitError> {
        let backend = self.backend.name().to_string();
        tracing::info!(%backend, "Submitting response");

        match self.backend.save(&self.response).await {
            Ok(receipt) => {
                tracing::info!(%backend, message = %receipt.message, "Response saved");
                Ok(Submitted {
                    response: self.response,
                    receipt,
                })
            }
            Err(e) => {
                tracing::error!(%backend, error = %e, "Error submitting survey");
                Err(SubmitError::Backend(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::mock::MockBackend;
    use crate::submit::Capability;

    fn complete() -> SurveyResponse {
        SurveyResponse {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            proud_of: vec!["Shipped X".into(), "  ".into(), String::new()],
            ..Default::default()
        }
    }

    fn coordinator(backend: &MockBackend) -> SubmissionCoordinator {
        SubmissionCoordinator::new(Arc::new(backend.clone()))
    }

    #[tokio::test]
    async fn test_submit_finalizes_before_save() {
        let backend = MockBackend::new("mock", Capability::AppendRow);
        let submitted = coordinator(&backend).submit(&complete()).await.unwrap();

        assert_eq!(submitted.response.proud_of, vec!["Shipped X".to_string()]);
        assert_eq!(backend.saved()[0].proud_of, vec!["Shipped X".to_string()]);
        assert_eq!(submitted.receipt.backend, "mock");
    }

    #[tokio::test]
    async fn test_missing_email_never_reaches_backend() {
        let backend = MockBackend::new("mock", Capability::AppendRow);
        let mut response = complete();
        response.email = "   ".into();

        let err = coordinator(&backend).submit(&response).await.unwrap_err();
        match err {
            SubmitError::Validation(v) => assert_eq!(v.missing, vec!["email"]),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_second_start_rejected_while_pending() {
        let backend = MockBackend::new("mock", Capability::AppendRow);
        let coordinator = coordinator(&backend);

        let pending = coordinator.start(&complete()).unwrap();
        assert!(coordinator.is_in_flight());
        assert!(matches!(
            coordinator.start(&complete()),
            Err(SubmitError::InFlight)
        ));

        pending.run().await.unwrap();
        assert!(!coordinator.is_in_flight());
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_guard_released_on_failure_and_drop() {
        let backend = MockBackend::failing("mock", Capability::AppendRow, "disk full");
        let coordinator = coordinator(&backend);

        let err = coordinator.submit(&complete()).await.unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert!(!coordinator.is_in_flight());

        drop(coordinator.start(&complete()).unwrap());
        assert!(!coordinator.is_in_flight());
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_submit_with_gated_backend() {
        let backend = MockBackend::new("mock", Capability::AppendRow).gated();
        let coordinator = Arc::new(coordinator(&backend));

        let first = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.submit(&complete()).await })
        };
        while !coordinator.is_in_flight() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            coordinator.submit(&complete()).await,
            Err(SubmitError::InFlight)
        ));

        backend.release();
        assert!(first.await.unwrap().is_ok());
        assert_eq!(backend.saved().len(), 1);
    }
}
