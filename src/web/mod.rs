//! HTTP server exposing the save endpoint and the CSV export

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::WebError;
pub use server::{build_router, run_server};
pub use state::WebAppState;
