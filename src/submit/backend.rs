use std::fmt;
use std::io;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::survey::SurveyResponse;

/// What kind of storage a backend provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Appends one row per response to a shared table
    AppendRow,
    /// Keeps one document per response
    Archive,
    /// Hands the response to another service
    Forward,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::AppendRow => "append-row",
            Capability::Archive => "archive",
            Capability::Forward => "forward",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a successful save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReceipt {
    /// Name of the backend that stored the response
    pub backend: String,
    pub message: String,
    /// Backend-specific location or identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl SaveReceipt {
    pub fn new(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// One failed attempt inside a fallback chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptFailure {
    pub backend: String,
    pub capability: Capability,
    pub error: String,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.backend, self.capability, self.error)
    }
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Name and email are required")]
    MissingIdentity,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to encode response: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Save endpoint returned {status}: {details}")]
    Remote { status: u16, details: String },
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("All backends failed: {}", format_attempts(.0))]
    Exhausted(Vec<AttemptFailure>),
}

fn format_attempts(attempts: &[AttemptFailure]) -> String {
    if attempts.is_empty() {
        return "no backends configured".to_string();
    }
    attempts
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Persistence boundary for finished responses
#[async_trait]
pub trait SaveBackend: Send + Sync {
    /// Short identifier used in logs and receipts
    fn name(&self) -> &str;

    fn capability(&self) -> Capability;

    /// Store one response
    async fn save(&self, response: &SurveyResponse) -> Result<SaveReceipt, BackendError>;
}

/// Reject responses without name or email before touching storage
pub(crate) fn require_identity(response: &SurveyResponse) -> Result<(), BackendError> {
    if response.has_identity() {
        Ok(())
    } else {
        Err(BackendError::MissingIdentity)
    }
}
