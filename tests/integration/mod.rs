//! Integration tests for lookback
//!
//! These tests drive several components together: the wizard with real
//! draft files, the file backends, and the compiled binary.

#[path = "../common/mod.rs"]
pub mod common;

pub mod cli;
pub mod submission;
pub mod wizard_flow;
