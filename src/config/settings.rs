use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::draft::{AutosaveSettings, DEFAULT_DRAFT_KEY};
use crate::submit::BackendConfig;
use crate::survey::Prefill;
use crate::util::paths::{config_path, data_dir};

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for drafts, responses and logs
    pub data_dir: PathBuf,
    pub autosave: AutosaveConfig,
    /// Where submitted responses are stored
    pub backend: BackendConfig,
    pub server: ServerConfig,
    /// Defaults for the basic info section
    pub prefill: Prefill,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutosaveConfig {
    pub enabled: bool,
    pub key: String,
    pub debounce: Duration,
    pub grace: Duration,
}

impl AutosaveConfig {
    pub fn settings(&self) -> AutosaveSettings {
        AutosaveSettings {
            key: self.key.clone(),
            debounce: self.debounce,
            grace: self.grace,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlAutosaveConfig {
    pub enabled: Option<bool>,
    pub key: Option<String>,
    pub debounce_ms: Option<u64>,
    pub grace_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` to bind; bare IPv6 hosts are bracketed
    pub fn addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlPrefill {
    pub name: Option<String>,
    pub role: Option<String>,
    pub product: Option<String>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub autosave: Option<TomlAutosaveConfig>,
    pub backend: Option<BackendConfig>,
    pub server: Option<TomlServerConfig>,
    pub prefill: Option<TomlPrefill>,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_data_dir(data_dir())
    }
}

impl Config {
    /// Defaults rooted at `dir`
    pub fn for_data_dir(dir: PathBuf) -> Self {
        let defaults = AutosaveSettings::default();
        Self {
            backend: BackendConfig::csv_in(&dir),
            data_dir: dir,
            autosave: AutosaveConfig {
                enabled: true,
                key: DEFAULT_DRAFT_KEY.to_string(),
                debounce: defaults.debounce,
                grace: defaults.grace,
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            prefill: Prefill::default(),
        }
    }

    /// Load configuration from file, merging with defaults
    pub fn load() -> Self {
        let config_file = config_path();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        Self::load_from(&config_file)
    }

    /// Load from a specific file; a missing or invalid file yields defaults
    pub fn load_from(path: &Path) -> Self {
        let mut config = Config::default();

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => return config,
        };
        match toml::from_str::<TomlConfig>(&contents) {
            Ok(toml_config) => config.merge(toml_config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid config file");
            }
        }
        config
    }

    /// Apply the values present in a parsed config file
    pub fn merge(&mut self, toml_config: TomlConfig) {
        if let Some(autosave) = toml_config.autosave {
            if let Some(enabled) = autosave.enabled {
                self.autosave.enabled = enabled;
            }
            if let Some(key) = autosave.key.filter(|k| !k.trim().is_empty()) {
                self.autosave.key = key;
            }
            if let Some(ms) = autosave.debounce_ms {
                self.autosave.debounce = Duration::from_millis(ms);
            }
            if let Some(ms) = autosave.grace_ms {
                self.autosave.grace = Duration::from_millis(ms);
            }
        }

        if let Some(backend) = toml_config.backend {
            self.backend = backend.rooted_at(&self.data_dir);
        }

        if let Some(server) = toml_config.server {
            if let Some(host) = server.host {
                self.server.host = host;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
        }

        if let Some(prefill) = toml_config.prefill {
            let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
            self.prefill = Prefill {
                name: non_empty(prefill.name),
                role: non_empty(prefill.role),
                product: non_empty(prefill.product),
            };
        }
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }

    /// Prefill from config, with each given value taking precedence
    pub fn prefill_with(&self, overrides: Prefill) -> Prefill {
        Prefill {
            name: overrides.name.or_else(|| self.prefill.name.clone()),
            role: overrides.role.or_else(|| self.prefill.role.clone()),
            product: overrides.product.or_else(|| self.prefill.product.clone()),
        }
    }
}
