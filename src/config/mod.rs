//! Configuration file loading and parsing.
//!
//! This module handles loading the configuration file from disk and parsing
//! it into validated, type-safe structures.
//!
//! # Configuration File Locations
//!
//! The configuration file is searched in the following order:
//!
//! 1. Path given on the command line (must exist)
//! 2. Default location, if present:
//!    - **Linux/macOS:** `~/.bondfan/config.json`
//!    - **Windows:** `%USERPROFILE%\.bondfan\config.json`
//! 3. Built-in defaults reproducing the Caravel reference design

pub mod reference;
mod settings;

pub use settings::{
    Config, DieConfig, FootprintConfig, LoggingConfig, MappingConfig, PatternConfig, RingConfig,
    RoutingConfig,
};

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Returns the default configuration directory.
///
/// - **Linux/macOS:** `~/.bondfan/`
/// - **Windows:** `%USERPROFILE%\.bondfan\`
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".bondfan"))
}

/// Returns the platform-specific default configuration file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join("config.json"))
}

/// Loads, parses and validates the configuration.
///
/// An explicit `path` must exist. With `None`, the default location is used
/// when a file is present there; otherwise the built-in defaults apply.
///
/// # Errors
///
/// Returns an error if:
/// - An explicit configuration file cannot be found
/// - The file cannot be read
/// - The JSON is malformed
/// - Fields are invalid or the mapping tables are inconsistent
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound {
                    path: p.to_path_buf(),
                });
            }
            p.to_path_buf()
        }
        None => match default_config_path().filter(|p| p.exists()) {
            Some(p) => p,
            None => {
                tracing::debug!("No configuration file found, using built-in defaults");
                let config = Config::default();
                config.validate()?;
                return Ok(config);
            }
        },
    };

    let config = read_config(&config_path)?;
    tracing::info!(path = %config_path.display(), "Loaded configuration");
    Ok(config)
}

/// Reads and validates one configuration file.
fn read_config(config_path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    config.validate()?;

    Ok(config)
}
