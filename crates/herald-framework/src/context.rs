//! The context handed to command handlers.
//!
//! A [`CommandContext`] is created for every invocation that passes
//! validation and authorization. It carries:
//!
//! - who sent the command and which command it was,
//! - the raw tokens and the typed [`Arguments`],
//! - whether the sender is on the admin list,
//! - the [`Messenger`](herald_core::Messenger) to reply through,
//! - shared state registered when the dispatcher was built.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::schema::Arguments;
use herald_core::BoxedMessenger;

/// Type-keyed shared state, fixed when the dispatcher is built.
///
/// Handlers read it through [`CommandContext::state`]; nothing mutates the
/// map after construction, so it is shared without locking.
#[derive(Default, Clone)]
pub struct StateMap {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl StateMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Returns the value of type `T`, if one was inserted.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|value| Arc::clone(value).downcast::<T>().ok())
    }

    /// Returns the number of stored values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for StateMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMap")
            .field("len", &self.entries.len())
            .finish()
    }
}

struct ContextInner {
    actor_id: String,
    command: String,
    tokens: Vec<String>,
    args: Arguments,
    is_admin: bool,
    messenger: BoxedMessenger,
    state: Arc<StateMap>,
}

/// Everything a handler needs to act on one invocation.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct CommandContext {
    inner: Arc<ContextInner>,
}

impl CommandContext {
    pub(crate) fn new(
        actor_id: &str,
        command: &str,
        tokens: Vec<String>,
        args: Arguments,
        is_admin: bool,
        messenger: BoxedMessenger,
        state: Arc<StateMap>,
    ) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                actor_id: actor_id.to_string(),
                command: command.to_string(),
                tokens,
                args,
                is_admin,
                messenger,
                state,
            }),
        }
    }

    /// Returns the sender's identity.
    pub fn actor_id(&self) -> &str {
        &self.inner.actor_id
    }

    /// Returns the identifier of the command being run.
    pub fn command(&self) -> &str {
        &self.inner.command
    }

    /// Returns the raw argument tokens.
    pub fn tokens(&self) -> &[String] {
        &self.inner.tokens
    }

    /// Returns the typed arguments.
    pub fn args(&self) -> &Arguments {
        &self.inner.args
    }

    /// Returns `true` if the sender is on the admin list.
    pub fn is_admin(&self) -> bool {
        self.inner.is_admin
    }

    /// Returns the messenger.
    pub fn messenger(&self) -> &BoxedMessenger {
        &self.inner.messenger
    }

    /// Returns shared state of type `T`.
    pub fn state<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.inner.state.get::<T>()
    }

    /// Sends `text` back to the sender, logging delivery failures.
    pub async fn reply(&self, text: &str) {
        self.send_to(self.actor_id(), text).await;
    }

    /// Sends `text` to another actor, logging delivery failures.
    pub async fn send_to(&self, actor_id: &str, text: &str) {
        if let Err(e) = self.inner.messenger.send(actor_id, text).await {
            warn!(actor = %actor_id, error = %e, "Failed to send message");
        }
    }
}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("actor_id", &self.inner.actor_id)
            .field("command", &self.inner.command)
            .field("tokens", &self.inner.tokens)
            .field("is_admin", &self.inner.is_admin)
            .finish_non_exhaustive()
    }
}
