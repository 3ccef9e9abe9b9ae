//! # Herald
//!
//! A text-command dispatcher for chat-driven bots.
//!
//! Herald receives a raw line of text from a remote user, decides whether it
//! is a command, resolves the command by name (with a fuzzy "did you mean"
//! fallback), validates its arguments against a typed schema, checks the
//! admin list and runs the handler.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐     ┌────────────┐     ┌────────┐     ┌─────────────────┐
//! │ Transport │────▶│ Dispatcher │────▶│ Router │────▶│ Handler         │
//! │ (yours)   │     │ (profiles) │     │        │────▶│ Suggester / Help│
//! └───────────┘     └────────────┘     └────────┘     └─────────────────┘
//! ```
//!
//! - **Core**: collaborator traits (`Messenger`, `ProfileStore`, `TextResolver`)
//! - **Framework**: schemas, registry, help, router, suggester, dispatcher
//! - **Runtime**: configuration, logging and the per-message task loop
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use herald::prelude::*;
//!
//! async fn ban(ctx: CommandContext) -> String {
//!     format!("Banned {}", ctx.args().text(0).unwrap_or_default())
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = HeraldRuntime::builder()
//!         .messenger(my_messenger)
//!         .command(|lang| {
//!             command("ban")
//!                 .privileged()
//!                 .required(ArgType::Text)
//!                 .optional(ArgType::Integer)
//!                 .describe(lang, "BanDescription", &[])
//!                 .handler(ban)
//!         })
//!         .build()?;
//!
//!     runtime.run(my_transport).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log lines

pub use herald_core as core;
pub use herald_framework as framework;
pub use herald_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use herald::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use herald_runtime::{HeraldConfig, HeraldRuntime, IncomingMessage};

    // Declaring commands
    pub use herald_framework::{
        ArgSlot, ArgType, ArgValue, Arguments, CommandContext, CommandDescriptor, command,
    };

    // Dispatching
    pub use herald_framework::{DispatchOptions, Dispatcher, Invocation, Outcome, Registry};

    // Collaborators
    pub use herald_core::{
        BoxedMessenger, BoxedProfileStore, LanguageTable, MemoryProfileStore, Messenger, Profile,
        ProfileStore, SendError, SendResult, StoreError, TextResolver,
    };
}
