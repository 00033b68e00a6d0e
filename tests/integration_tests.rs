//! Main entry point for integration tests
//!
//! Run with: `cargo test --test integration_tests`
//!
//! The `common` module is loaded via `#[path]` from the integration module
//! to avoid loading it twice.

mod integration;

pub use integration::*;
