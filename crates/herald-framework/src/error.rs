//! Error types for the Herald framework.

use thiserror::Error;

use crate::schema::ArgType;

/// A schema whose shape can never be satisfied consistently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A slot follows the variadic tail.
    #[error("slot {index} follows the variadic tail; the tail must be the last slot")]
    SlotAfterVariadic {
        /// Position of the offending slot.
        index: usize,
    },
}

/// Why a token list does not satisfy a schema.
///
/// These are expected, per-invocation failures. The actor only ever sees a
/// generic usage message; the detail is kept for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    /// A required slot has no token.
    #[error("missing required {expected} argument at position {index}")]
    Missing {
        /// Position of the missing argument.
        index: usize,
        /// Type the slot expects.
        expected: ArgType,
    },

    /// A token in an integer slot is not a safe base-10 integer.
    #[error("argument {index} ('{token}') is not an integer")]
    NotAnInteger {
        /// Position of the token.
        index: usize,
        /// The offending token.
        token: String,
    },

    /// A token in a text slot is empty.
    #[error("argument {index} is empty")]
    EmptyText {
        /// Position of the token.
        index: usize,
    },

    /// Tokens beyond the schema, rejected in strict mode.
    #[error("{count} unexpected trailing argument(s)")]
    Unexpected {
        /// Number of extra tokens.
        count: usize,
    },
}

/// Errors raised while building the command registry.
///
/// All of these are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two descriptors share an identifier.
    #[error("duplicate command identifier: {0}")]
    DuplicateIdentifier(String),

    /// A descriptor uses a name the router reserves for itself.
    #[error("command identifier '{0}' is reserved")]
    ReservedIdentifier(String),

    /// The identifier is empty, not lower-case, or contains separators.
    #[error("invalid command identifier '{identifier}': {reason}")]
    InvalidIdentifier {
        /// The rejected identifier.
        identifier: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The descriptor's schema is malformed.
    #[error("invalid schema for command '{identifier}': {source}")]
    Schema {
        /// The command being registered.
        identifier: String,
        /// The underlying schema error.
        #[source]
        source: SchemaError,
    },

    /// The delimiter is empty or contains a token separator.
    #[error("invalid command delimiter '{0}'")]
    InvalidDelimiter(String),
}

/// Result type for registry construction.
pub type RegistryResult<T> = Result<T, RegistryError>;
