use crate::submit::{SubmitError, Submitted};

/// Events delivered to the app loop from background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// A spawned submission finished
    SubmissionFinished(Result<Submitted, SubmitError>),
}
