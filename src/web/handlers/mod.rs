//! HTTP request handlers.

pub mod responses;
