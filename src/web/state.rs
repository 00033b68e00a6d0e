//! Shared state for request handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::submit::SaveBackend;

/// Cheaply cloneable handle given to every handler.
#[derive(Clone)]
pub struct WebAppState {
    backend: Arc<dyn SaveBackend>,
    csv_path: Option<Arc<PathBuf>>,
}

impl WebAppState {
    pub fn new(backend: Arc<dyn SaveBackend>, csv_path: Option<PathBuf>) -> Self {
        Self {
            backend,
            csv_path: csv_path.map(Arc::new),
        }
    }

    pub fn backend(&self) -> &Arc<dyn SaveBackend> {
        &self.backend
    }

    /// CSV file served by the download route, when one is configured
    pub fn csv_path(&self) -> Option<&Path> {
        self.csv_path.as_deref().map(PathBuf::as_path)
    }
}
