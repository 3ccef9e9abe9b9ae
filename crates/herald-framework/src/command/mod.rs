//! Command descriptors, the registry and help generation.
//!
//! Commands are declared with the [`command`] builder and collected into a
//! [`Registry`]:
//!
//! ```rust,ignore
//! use herald_framework::{ArgType, Registry, command};
//!
//! let registry = Registry::build("!", [
//!     command("ban")
//!         .privileged()
//!         .required(ArgType::Text)
//!         .optional(ArgType::Integer)
//!         .description("Ban a user for N days")
//!         .handler(ban)?,
//!     command("stock")
//!         .description("Show current stock")
//!         .handler(stock)?,
//! ])?;
//!
//! assert_eq!(registry.help(), "!stock -> Show current stock");
//! ```

pub mod descriptor;
pub mod help;
pub mod registry;

pub use descriptor::{CommandBuilder, CommandDescriptor, command};
pub use help::{VARIADIC_MARKER, render_line, render_shape};
pub use registry::{HELP_IDENTIFIER, Registry};
