//! Errors raised while loading or checking `HeraldConfig`.

use std::path::PathBuf;

use thiserror::Error;

/// Why a configuration could not be produced.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// The file extension names no enabled format.
    #[error("Unsupported or disabled configuration format: {0}")]
    UnsupportedFormat(PathBuf),

    /// The sources could not be parsed or merged.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A value failed a semantic check.
    #[error("Invalid configuration: {message}")]
    ValidationError { message: String },

    /// The command delimiter is unusable.
    #[error("Invalid command delimiter '{0}': must be non-empty without whitespace or commas")]
    InvalidDelimiter(String),

    /// An admin id appears twice.
    #[error("Duplicate admin id: {0}")]
    DuplicateAdmin(String),
}

impl ConfigError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

/// Shorthand for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
