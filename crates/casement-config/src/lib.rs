//! casement configuration system.
//!
//! TOML-based configuration with validation. All sections use defaults
//! so partial configs work out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    CasementConfig, LogLevel, LoggingConfig, ManagedAppConfig, ServerConfig, StoreBackend,
    StoreConfig, SyncConfig,
};
pub use toml_loader::{load_default, load_from_path, load_or_create};

use casement_common::ConfigError;

/// Load config from an explicit path when given, otherwise from the
/// platform default (creating it on first run).
pub fn load_config(path: Option<&std::path::Path>) -> Result<CasementConfig, ConfigError> {
    match path {
        Some(p) => load_from_path(p),
        None => load_default(),
    }
}

/// Serialize a config to a pretty-printed TOML string.
pub fn config_to_toml(config: &CasementConfig) -> Result<String, ConfigError> {
    toml::to_string_pretty(config)
        .map_err(|e| ConfigError::ParseError(format!("failed to serialize config to TOML: {e}")))
}
