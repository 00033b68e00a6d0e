//! REST API route definitions.

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::handlers::responses;
use crate::web::state::WebAppState;

/// Build the API router with all REST endpoints.
pub fn api_routes() -> Router<WebAppState> {
    Router::new()
        .route("/responses", post(responses::submit_response))
        .route("/responses.csv", get(responses::download_csv))
}
