//! Forwards responses to a save endpoint over HTTP

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::backend::{require_identity, BackendError, Capability, SaveBackend, SaveReceipt};
use crate::survey::SurveyResponse;

pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct SuccessBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    backend: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Clone)]
pub struct RemoteBackend {
    url: String,
    client: Client,
}

impl RemoteBackend {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Pick the most specific message out of an error body
fn error_details(text: &str) -> String {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(ErrorBody {
            details: Some(details),
            ..
        }) => details,
        Ok(ErrorBody {
            error: Some(error), ..
        }) => error,
        _ if text.trim().is_empty() => "Failed to save response".to_string(),
        _ => text.trim().to_string(),
    }
}

#[async_trait]
impl SaveBackend for RemoteBackend {
    fn name(&self) -> &str {
        "remote"
    }

    fn capability(&self) -> Capability {
        Capability::Forward
    }

    async fn save(&self, response: &SurveyResponse) -> Result<SaveReceipt, BackendError> {
        require_identity(response)?;

        let reply = self.client.post(&self.url).json(response).send().await?;
        let status = reply.status();
        let text = reply.text().await?;

        if !status.is_success() {
            return Err(BackendError::Remote {
                status: status.as_u16(),
                details: error_details(&text),
            });
        }

        let body: Option<SuccessBody> = serde_json::from_str(&text).ok();
        let mut receipt = SaveReceipt::new(
            self.name(),
            body.as_ref()
                .and_then(|b| b.message.clone())
                .unwrap_or_else(|| "Response saved".to_string()),
        );
        let upstream = body.as_ref().and_then(|b| b.backend.as_deref());
        let details = body.as_ref().and_then(|b| b.details.as_deref());
        receipt.details = match (upstream, details) {
            (Some(backend), Some(details)) => Some(format!("{}: {}", backend, details)),
            (Some(backend), None) => Some(backend.to_string()),
            (None, Some(details)) => Some(details.to_string()),
            (None, None) => None,
        };

        tracing::info!(url = %self.url, "Forwarded response");
        Ok(receipt)
    }
}
