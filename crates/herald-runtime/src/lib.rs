//! Herald Runtime - wiring and message loop for the Herald dispatcher.
//!
//! This crate provides:
//! - Layered configuration (`herald.toml`, `HERALD_*` environment variables)
//! - Logging setup driven by that configuration
//! - [`HeraldRuntime`], which registers commands against the loaded language
//!   table and dispatches each incoming message on its own task
//!
//! ```ignore
//! use herald_runtime::{HeraldRuntime, IncomingMessage};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = HeraldRuntime::builder()
//!         .messenger(my_messenger)
//!         .command(|lang| command("stock").describe(lang, "Stock", &[]).handler(stock))
//!         .build()?;
//!
//!     // Run until the transport closes or Ctrl+C
//!     runtime.run(my_transport_stream).await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{ConfigError, ConfigLoader, ConfigResult, HeraldConfig, validate_config};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{
    CommandFactory, HeraldRuntime, IncomingMessage, RuntimeBuilder, wait_for_shutdown,
};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// Provides the logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`, `instrument`
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
