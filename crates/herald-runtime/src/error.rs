//! Runtime error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use herald_core::LanguageError;
use herald_framework::RegistryError;

/// Errors that can occur while building or running the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A command could not be registered.
    #[error("Failed to register commands: {0}")]
    Registry(#[from] RegistryError),

    /// The language file could not be read.
    #[error("Failed to read language file {}: {source}", path.display())]
    LanguageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The language file is malformed.
    #[error("Invalid language file {}: {source}", path.display())]
    Language {
        path: PathBuf,
        #[source]
        source: LanguageError,
    },

    /// No messenger was supplied to the builder.
    #[error("A messenger is required to build the runtime")]
    MissingMessenger,
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
