//! Appends responses to a single CSV file

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::backend::{require_identity, BackendError, Capability, SaveBackend, SaveReceipt};
use super::csv::{header_line, parse_records, response_row};
use crate::survey::SurveyResponse;

pub struct CsvFileBackend {
    path: PathBuf,
    // Serializes header creation and appends from concurrent requests
    write_lock: Mutex<()>,
}

impl CsvFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back all stored rows, header excluded
    pub async fn read_responses(&self) -> Result<Vec<Vec<String>>, BackendError> {
        read_rows(&self.path).await
    }

    async fn append(&self, row: &str) -> Result<(), BackendError> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let is_new = !fs::try_exists(&self.path).await?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let mut buf = String::new();
        if is_new {
            buf.push_str(&header_line());
            buf.push('\n');
        }
        buf.push_str(row);
        buf.push('\n');

        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Rows of a CSV file written by [`CsvFileBackend`], header excluded
pub async fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, BackendError> {
    let content = fs::read_to_string(path).await?;
    let mut records = parse_records(&content)
        .map_err(|e| BackendError::Unavailable(format!("{}: {}", path.display(), e)))?;
    if !records.is_empty() {
        records.remove(0);
    }
    Ok(records)
}

#[async_trait]
impl SaveBackend for CsvFileBackend {
    fn name(&self) -> &str {
        "csv-file"
    }

    fn capability(&self) -> Capability {
        Capability::AppendRow
    }

    async fn save(&self, response: &SurveyResponse) -> Result<SaveReceipt, BackendError> {
        require_identity(response)?;
        let row = response_row(response, Utc::now());
        self.append(&row).await?;

        tracing::info!(path = %self.path.display(), "Appended response to CSV");
        Ok(SaveReceipt::new(self.name(), "Response saved to CSV file")
            .with_details(self.path.display().to_string()))
    }
}
