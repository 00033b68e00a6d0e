//! One JSON document per response plus a combined archive file

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;

use super::backend::{require_identity, BackendError, Capability, SaveBackend, SaveReceipt};
use crate::survey::SurveyResponse;

/// Combined archive of every response, with `submittedAt`
pub const ARCHIVE_FILE: &str = "all-responses.json";

pub struct JsonArchiveBackend {
    dir: PathBuf,
    archive_lock: Mutex<()>,
}

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]").expect("name pattern is valid"));

/// Replace everything but ASCII letters and digits with `_`
pub fn sanitize_name(name: &str) -> String {
    UNSAFE_CHARS.replace_all(name, "_").into_owned()
}

/// `<timestamp>-<name>.json` with `:` and `.` in the timestamp made file-safe
pub fn document_name(name: &str, timestamp: &str) -> String {
    let stamp = timestamp.replace([':', '.'], "-");
    format!("{}-{}.json", stamp, sanitize_name(name))
}

impl JsonArchiveBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            archive_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn archive_path(&self) -> PathBuf {
        self.dir.join(ARCHIVE_FILE)
    }

    /// Append to the combined archive, returning the new total
    async fn append_to_archive(&self, entry: Value) -> Result<usize, BackendError> {
        let _guard = self.archive_lock.lock().await;
        let path = self.archive_path();

        let mut all: Vec<Value> = if fs::try_exists(&path).await? {
            let existing = fs::read_to_string(&path).await?;
            serde_json::from_str(&existing)?
        } else {
            Vec::new()
        };
        all.push(entry);

        fs::write(&path, serde_json::to_string_pretty(&all)?).await?;
        Ok(all.len())
    }
}

#[async_trait]
impl SaveBackend for JsonArchiveBackend {
    fn name(&self) -> &str {
        "json-archive"
    }

    fn capability(&self) -> Capability {
        Capability::Archive
    }

    async fn save(&self, response: &SurveyResponse) -> Result<SaveReceipt, BackendError> {
        require_identity(response)?;
        fs::create_dir_all(&self.dir).await?;

        let submitted_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let filename = document_name(&response.name, &submitted_at);
        let filepath = self.dir.join(&filename);
        fs::write(&filepath, serde_json::to_string_pretty(response)?).await?;

        let mut entry = serde_json::to_value(response)?;
        if let Value::Object(map) = &mut entry {
            map.insert("submittedAt".to_string(), Value::String(submitted_at));
        }
        let total = self.append_to_archive(entry).await?;

        tracing::info!(file = %filepath.display(), total, "Archived response");
        Ok(SaveReceipt::new(
            self.name(),
            format!("Response saved successfully ({} total)", total),
        )
        .with_details(filename))
    }
}
