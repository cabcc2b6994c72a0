//! Core TOML config loading: read from path or platform default.

use crate::schema::CasementConfig;
use crate::validation;
use casement_common::ConfigError;
use std::path::Path;
use tracing::info;

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Missing fields fall back to serde defaults. A config that parses but
/// fails validation is rejected with `ConfigError::ValidationError`.
pub fn load_from_path(path: &Path) -> Result<CasementConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: CasementConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    validation::validate(&config)?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from `path`, writing the commented default template there
/// first if the file does not exist yet.
pub fn load_or_create(path: &Path) -> Result<CasementConfig, ConfigError> {
    match load_from_path(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(path)?;
            Ok(CasementConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Load config from the platform-specific default path.
///
/// On Windows: `%APPDATA%\casement\config.toml`
/// On Linux: `~/.config/casement/config.toml`
pub fn load_default() -> Result<CasementConfig, ConfigError> {
    let path = default_config_path()?;
    load_or_create(&path)
}
