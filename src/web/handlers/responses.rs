//! Survey response handlers for the lookback web API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::survey::SurveyResponse;
use crate::web::error::WebError;
use crate::web::state::WebAppState;

/// Body returned after a response is stored.
#[derive(Debug, Serialize)]
pub struct SubmitResponseBody {
    pub success: bool,
    pub message: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Store one survey response with the configured backend.
pub async fn submit_response(
    State(state): State<WebAppState>,
    payload: Result<Json<SurveyResponse>, JsonRejection>,
) -> Result<Json<SubmitResponseBody>, WebError> {
    let Json(response) = payload?;
    let response = response.finalized();
    if !response.has_identity() {
        return Err(WebError::BadRequest(
            "Name and email are required".to_string(),
        ));
    }

    let receipt = state.backend().save(&response).await?;
    tracing::info!(backend = %receipt.backend, "Stored survey response");

    Ok(Json(SubmitResponseBody {
        success: true,
        message: receipt.message,
        backend: receipt.backend,
        details: receipt.details,
    }))
}

/// Attachment name for a CSV export made today
pub fn export_file_name() -> String {
    format!("survey-responses-{}.csv", Utc::now().format("%Y-%m-%d"))
}

/// Download every collected response as CSV.
pub async fn download_csv(State(state): State<WebAppState>) -> Result<Response, WebError> {
    let not_found = || WebError::NotFound("CSV file not found. No responses yet.".to_string());

    let path = state.csv_path().ok_or_else(not_found)?;
    let content = match tokio::fs::read(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(WebError::Internal(format!("Failed to download CSV: {}", e))),
    };

    let disposition = format!("attachment; filename=\"{}\"", export_file_name());
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| WebError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/csv")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response())
}
