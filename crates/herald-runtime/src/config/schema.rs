//! Configuration schema definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use herald_framework::{DEFAULT_THRESHOLD, DispatchOptions};
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HeraldConfig {
    /// Command routing settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Localized string table.
    #[serde(default)]
    pub language: LanguageConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

// =============================================================================
// Dispatch
// =============================================================================

/// Command routing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Prefix marking a message as a command.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Actor ids allowed to run privileged commands.
    #[serde(default)]
    pub admins: Vec<String>,

    /// Suggestions must score strictly above this (0-1000).
    #[serde(default = "default_suggest_threshold")]
    pub suggest_threshold: u32,

    /// Reject tokens beyond a command's schema.
    #[serde(default)]
    pub strict_arity: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            admins: Vec::new(),
            suggest_threshold: default_suggest_threshold(),
            strict_arity: false,
        }
    }
}

impl DispatchConfig {
    /// Converts to the framework's routing options.
    pub fn to_options(&self) -> DispatchOptions {
        DispatchOptions {
            admins: self.admins.iter().cloned().collect(),
            suggest_threshold: self.suggest_threshold,
            strict_arity: self.strict_arity,
        }
    }
}

fn default_delimiter() -> String {
    "!".to_string()
}

fn default_suggest_threshold() -> u32 {
    DEFAULT_THRESHOLD
}

// =============================================================================
// Language
// =============================================================================

/// Localized string table settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LanguageConfig {
    /// JSON file mapping keys to templates. Without it, keys resolve to
    /// themselves.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Logging
// =============================================================================

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Base level.
    #[serde(default)]
    pub level: LogLevel,

    /// Line format.
    #[serde(default)]
    pub format: LogFormat,

    /// Destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Log file, used when `output = "file"`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Per-module levels, e.g. `herald_framework = "debug"`.
    #[serde(default)]
    pub filters: BTreeMap<String, String>,

    /// Include thread ids.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include source file and line.
    #[serde(default)]
    pub file_location: bool,

    /// Span lifecycle events to log.
    #[serde(default)]
    pub span_events: SpanEventConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file_path: None,
            filters: BTreeMap::new(),
            thread_ids: false,
            file_location: false,
            span_events: SpanEventConfig::default(),
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// All level names, lowest first.
    pub const NAMES: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];

    /// Returns the level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature.
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HeraldConfig::default();
        assert_eq!(config.dispatch.delimiter, "!");
        assert_eq!(config.dispatch.suggest_threshold, 200);
        assert!(!config.dispatch.strict_arity);
        assert!(config.language.path.is_none());
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_to_options() {
        let dispatch = DispatchConfig {
            admins: vec!["1".into(), "2".into()],
            suggest_threshold: 300,
            strict_arity: true,
            ..Default::default()
        };

        let options = dispatch.to_options();
        assert!(options.admins.contains("2"));
        assert_eq!(options.suggest_threshold, 300);
        assert!(options.strict_arity);
    }
}
