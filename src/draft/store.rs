//! Local durable key-value storage for drafts

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("Draft storage unavailable: {0}")]
    Unavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to encode draft: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-value storage holding serialized drafts
pub trait DraftStore: Send + Sync {
    /// Read the value under `key`, `None` if absent
    fn read(&self, key: &str) -> Result<Option<String>, DraftError>;

    /// Store `value` under `key`, replacing any previous value
    fn write(&self, key: &str, value: &str) -> Result<(), DraftError>;

    /// Delete `key`; deleting a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), DraftError>;
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl DraftStore for FileDraftStore {
    fn read(&self, key: &str) -> Result<Option<String>, DraftError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), DraftError> {
        fs::create_dir_all(&self.dir)?;
        // Atomic replace through a sibling temp file
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DraftError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, shared between clones.
///
/// Writes can be switched to fail to exercise degraded autosave.
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: impl Into<String>) {
        self.entries.lock().insert(key.to_string(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }
}

impl DraftStore for MemoryDraftStore {
    fn read(&self, key: &str) -> Result<Option<String>, DraftError> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), DraftError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DraftError::Unavailable("quota exceeded".to_string()));
        }
        self.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DraftError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Store used when autosave is turned off
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledDraftStore;

impl DraftStore for DisabledDraftStore {
    fn read(&self, _key: &str) -> Result<Option<String>, DraftError> {
        Err(DraftError::Unavailable("autosave disabled".to_string()))
    }

    fn write(&self, _key: &str, _value: &str) -> Result<(), DraftError> {
        Err(DraftError::Unavailable("autosave disabled".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), DraftError> {
        Err(DraftError::Unavailable("autosave disabled".to_string()))
    }
}
