//! Configuration error types.
//!
//! Layout and extraction errors live next to their subsystems in
//! [`crate::layout`] and [`crate::extract`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or validating the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },

    /// The die pad mapping tables are inconsistent.
    #[error("invalid mapping for die pad {pad}: {message}")]
    MappingIntegrity {
        /// Offending die pad index.
        pad: usize,
        /// Description of the inconsistency.
        message: String,
    },
}

impl ConfigError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    /// Creates a mapping integrity error for die pad `pad`.
    pub fn mapping(pad: usize, message: impl Into<String>) -> Self {
        Self::MappingIntegrity {
            pad,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let error = ConfigError::NotFound {
            path: PathBuf::from("/path/to/config.json"),
        };
        let msg = error.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("config.json"));
    }

    #[test]
    fn validation_error_display() {
        let msg = ConfigError::validation("landing_pads must be positive").to_string();
        assert!(msg.contains("landing_pads must be positive"));
    }

    #[test]
    fn mapping_error_names_pad() {
        let msg = ConfigError::mapping(17, "finger 80 out of range").to_string();
        assert!(msg.contains("die pad 17"));
        assert!(msg.contains("finger 80"));
    }
}
