//! Response persistence: the backend boundary, concrete backends, and the
//! submission coordinator

pub mod backend;
pub mod chain;
pub mod coordinator;
pub mod csv;
pub mod csv_file;
pub mod json_archive;
pub mod mock;
pub mod remote;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use backend::{AttemptFailure, BackendError, Capability, SaveBackend, SaveReceipt};
pub use chain::FallbackChain;
pub use coordinator::{PendingSubmission, SubmissionCoordinator, SubmitError, Submitted};
pub use csv_file::CsvFileBackend;
pub use json_archive::JsonArchiveBackend;
pub use remote::RemoteBackend;

/// Which backend stores submitted responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BackendConfig {
    CsvFile {
        path: PathBuf,
    },
    JsonArchive {
        dir: PathBuf,
    },
    Remote {
        url: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    Chain {
        backends: Vec<BackendConfig>,
    },
}

fn default_timeout_secs() -> u64 {
    remote::DEFAULT_REMOTE_TIMEOUT.as_secs()
}

impl BackendConfig {
    /// Default CSV location under a data directory
    pub fn csv_in(data_dir: &Path) -> Self {
        BackendConfig::CsvFile {
            path: data_dir.join("survey-responses").join("survey-responses.csv"),
        }
    }

    /// Resolve relative file locations against `base`
    pub fn rooted_at(self, base: &Path) -> Self {
        let root = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        match self {
            BackendConfig::CsvFile { path } => BackendConfig::CsvFile { path: root(path) },
            BackendConfig::JsonArchive { dir } => BackendConfig::JsonArchive { dir: root(dir) },
            BackendConfig::Chain { backends } => BackendConfig::Chain {
                backends: backends.into_iter().map(|b| b.rooted_at(base)).collect(),
            },
            remote @ BackendConfig::Remote { .. } => remote,
        }
    }

    /// Instantiate the configured backend
    pub fn build(&self) -> Result<Arc<dyn SaveBackend>, BackendError> {
        let backend: Arc<dyn SaveBackend> = match self {
            BackendConfig::CsvFile { path } => Arc::new(CsvFileBackend::new(path)),
            BackendConfig::JsonArchive { dir } => Arc::new(JsonArchiveBackend::new(dir)),
            BackendConfig::Remote { url, timeout_secs } => Arc::new(RemoteBackend::new(
                url.clone(),
                Duration::from_secs(*timeout_secs),
            )?),
            BackendConfig::Chain { backends } => Arc::new(FallbackChain::new(
                backends
                    .iter()
                    .map(BackendConfig::build)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
        };
        Ok(backend)
    }

    /// The first CSV file this config writes to, if any
    pub fn csv_path(&self) -> Option<&Path> {
        match self {
            BackendConfig::CsvFile { path } => Some(path),
            BackendConfig::Chain { backends } => backends.iter().find_map(|b| b.csv_path()),
            _ => None,
        }
    }

    /// Short description for logs and the CLI
    pub fn describe(&self) -> String {
        match self {
            BackendConfig::CsvFile { path } => format!("csv-file ({})", path.display()),
            BackendConfig::JsonArchive { dir } => format!("json-archive ({})", dir.display()),
            BackendConfig::Remote { url, .. } => format!("remote ({})", url),
            BackendConfig::Chain { backends } => format!(
                "chain [{}]",
                backends
                    .iter()
                    .map(|b| b.describe())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_config() {
        let config: BackendConfig = toml::from_str(
            r#"
            kind = "chain"

            [[backends]]
            kind = "remote"
            url = "http://localhost:3000/api/responses"

            [[backends]]
            kind = "csv-file"
            path = "/tmp/responses.csv"
            "#,
        )
        .unwrap();

        match &config {
            BackendConfig::Chain { backends } => {
                assert_eq!(backends.len(), 2);
                assert_eq!(
                    backends[0],
                    BackendConfig::Remote {
                        url: "http://localhost:3000/api/responses".into(),
                        timeout_secs: 30,
                    }
                );
            }
            other => panic!("expected chain, got {:?}", other),
        }
        assert_eq!(config.csv_path(), Some(Path::new("/tmp/responses.csv")));
    }

    #[test]
    fn test_build_chain() {
        let config = BackendConfig::Chain {
            backends: vec![
                BackendConfig::JsonArchive {
                    dir: "/tmp/archive".into(),
                },
                BackendConfig::csv_in(Path::new("/tmp/data")),
            ],
        };
        let backend = config.build().unwrap();
        assert_eq!(backend.name(), "chain");
        assert_eq!(backend.capability(), Capability::Archive);
        assert_eq!(
            config.csv_path(),
            Some(Path::new("/tmp/data/survey-responses/survey-responses.csv"))
        );
    }

    #[test]
    fn test_rooted_at_only_touches_relative_paths() {
        let config = BackendConfig::Chain {
            backends: vec![
                BackendConfig::CsvFile {
                    path: "responses.csv".into(),
                },
                BackendConfig::JsonArchive {
                    dir: "/srv/archive".into(),
                },
            ],
        }
        .rooted_at(Path::new("/home/me/.lookback"));

        assert_eq!(
            config.csv_path(),
            Some(Path::new("/home/me/.lookback/responses.csv"))
        );
        assert!(config.describe().contains("json-archive (/srv/archive)"));
    }

    #[test]
    fn test_remote_has_no_csv() {
        let config = BackendConfig::Remote {
            url: "http://example.com".into(),
            timeout_secs: 5,
        };
        assert!(config.csv_path().is_none());
        assert_eq!(config.describe(), "remote (http://example.com)");
    }
}
