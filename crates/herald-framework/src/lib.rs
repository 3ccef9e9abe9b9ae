//! # Herald Framework
//!
//! Command resolution and argument validation for chat bots.
//!
//! This layer provides:
//! - Typed argument schemas with optional slots and variadic tails
//! - A command registry that renders standard and admin help documents
//! - A router with admin gating and fuzzy "did you mean" suggestions
//! - The [`Dispatcher`] entry point that transports feed raw messages into
//!
//! Data flows one way: raw text, tokens, validated [`Arguments`], handler.

pub mod command;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod router;
pub mod schema;
pub mod split;
pub mod suggest;

pub use command::{CommandBuilder, CommandDescriptor, HELP_IDENTIFIER, Registry, command};
pub use context::{CommandContext, StateMap};
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::{ArgError, RegistryError, RegistryResult, SchemaError};
pub use handler::{BoxedHandler, HandleResponse, Handler, into_handler};
pub use router::{AdminList, DispatchOptions, Outcome, Router};
pub use schema::{ArgSlot, ArgType, ArgValue, Arguments, MAX_SAFE_INTEGER, Schema};
pub use split::{Invocation, tokenize};
pub use suggest::{DEFAULT_THRESHOLD, Suggester, Suggestion};
