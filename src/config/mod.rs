mod settings;

pub use settings::{
    AutosaveConfig, Config, ServerConfig, TomlAutosaveConfig, TomlConfig, TomlPrefill,
    TomlServerConfig, EXAMPLE_CONFIG,
};
