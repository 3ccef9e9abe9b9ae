//! Configuration for the Herald runtime.
//!
//! Layered loading through figment (files, `HERALD_*` environment variables,
//! programmatic overrides) into a typed [`HeraldConfig`], plus validation.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    ConfigLoader, ConfigProfile, ConfigSource, ENV_PREFIX, PROFILE_ENV, load_config,
    load_config_from_file,
};
pub use schema::{
    DispatchConfig, HeraldConfig, LanguageConfig, LogFormat, LogLevel, LogOutput, LoggingConfig,
    SpanEventConfig,
};
pub use validation::validate_config;
