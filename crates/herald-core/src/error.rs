//! Error types shared by the collaborator interfaces.

use thiserror::Error;

/// Errors raised by a [`ProfileStore`](crate::ProfileStore).
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// No profile exists for the actor and the store does not create them.
    #[error("profile not found: {0}")]
    NotFound(String),
}

/// Result type for profile store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while delivering a message through a [`Messenger`](crate::Messenger).
#[derive(Debug, Clone, Error)]
pub enum SendError {
    /// The recipient could not be reached.
    #[error("failed to deliver message to '{actor_id}': {reason}")]
    Undeliverable {
        /// The intended recipient.
        actor_id: String,
        /// Reason reported by the transport.
        reason: String,
    },
}

/// Result type for message delivery.
pub type SendResult = Result<(), SendError>;

/// Errors raised while loading a language table.
#[derive(Debug, Error)]
pub enum LanguageError {
    /// The table is not valid JSON.
    #[error("failed to parse language table: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value in the table is not a string.
    #[error("language entry '{0}' is not a string")]
    NotAString(String),
}
