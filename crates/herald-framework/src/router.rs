//! Resolving an identifier to a command and running it.
//!
//! [`Router::route`] handles command-form messages:
//!
//! 1. `help` sends the admin document to admins and the standard one to
//!    everyone else.
//! 2. Known identifiers have their tokens validated, then privileged commands
//!    are checked against the [`AdminList`], then the handler runs.
//! 3. Unknown identifiers fall through to [`Router::suggest`].
//!
//! Every rejection sends exactly one message and stops.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::command::{HELP_IDENTIFIER, Registry};
use crate::context::{CommandContext, StateMap};
use crate::error::ArgError;
use crate::suggest::{DEFAULT_THRESHOLD, Suggester, render_suggestions};
use herald_core::BoxedMessenger;

/// Sent when tokens do not satisfy the command's schema.
pub const INVALID_USAGE: &str = "Invalid Usage!";

/// Sent when a non-admin runs a privileged command.
pub const ADMINS_ONLY: &str = "This command is for admins only!";

/// Sent to blocked actors.
pub const BLOCKED: &str = "You are banned.";

/// Sent when the profile store cannot be reached.
pub const INTERNAL_ERROR: &str = "Internal Error, try adding me again!";

/// Actor ids allowed to run privileged commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminList {
    ids: HashSet<String>,
}

impl AdminList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `actor_id` is an admin.
    pub fn contains(&self, actor_id: &str) -> bool {
        self.ids.contains(actor_id)
    }

    /// Adds an admin.
    pub fn insert(&mut self, actor_id: impl Into<String>) {
        self.ids.insert(actor_id.into());
    }

    /// Returns the number of admins.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nobody is an admin.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AdminList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Vec<String>> for AdminList {
    fn from(ids: Vec<String>) -> Self {
        ids.into_iter().collect()
    }
}

/// Options controlling routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Who may run privileged commands.
    pub admins: AdminList,
    /// Suggestion scores must be strictly above this.
    pub suggest_threshold: u32,
    /// Reject tokens beyond the schema instead of ignoring them.
    pub strict_arity: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            admins: AdminList::default(),
            suggest_threshold: DEFAULT_THRESHOLD,
            strict_arity: false,
        }
    }
}

/// What happened to one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A help document was sent.
    Help {
        /// `true` if the admin document was sent.
        admin: bool,
    },
    /// The handler ran.
    Invoked {
        /// The command that ran.
        command: String,
    },
    /// The tokens did not satisfy the schema.
    InvalidUsage {
        /// The command that was rejected.
        command: String,
        /// Why the tokens were rejected.
        error: ArgError,
    },
    /// A non-admin tried a privileged command.
    AdminsOnly {
        /// The command that was rejected.
        command: String,
    },
    /// A "did you mean" message was sent.
    Suggested {
        /// Candidate identifiers, best first.
        candidates: Vec<String>,
    },
    /// Nothing matched closely enough; nothing was sent.
    Silent,
    /// The actor is blocked.
    Blocked,
    /// The profile store failed.
    StoreUnavailable,
}

/// Resolves identifiers against a [`Registry`] and runs handlers.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct Router {
    registry: Arc<Registry>,
    admins: Arc<AdminList>,
    suggester: Suggester,
    strict_arity: bool,
    messenger: BoxedMessenger,
    state: Arc<StateMap>,
}

impl Router {
    /// Creates a router.
    pub fn new(
        registry: Arc<Registry>,
        options: DispatchOptions,
        messenger: BoxedMessenger,
        state: Arc<StateMap>,
    ) -> Self {
        Self {
            registry,
            admins: Arc::new(options.admins),
            suggester: Suggester::new(options.suggest_threshold),
            strict_arity: options.strict_arity,
            messenger,
            state,
        }
    }

    /// Returns the registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns `true` if `actor_id` is on the admin list.
    pub fn is_admin(&self, actor_id: &str) -> bool {
        self.admins.contains(actor_id)
    }

    /// Routes a command-form invocation.
    pub async fn route(&self, identifier: &str, actor_id: &str, tokens: Vec<String>) -> Outcome {
        let is_admin = self.is_admin(actor_id);

        if identifier == HELP_IDENTIFIER {
            debug!(admin = is_admin, "Sending help");
            self.notify(actor_id, self.registry.help_for(is_admin)).await;
            return Outcome::Help { admin: is_admin };
        }

        let Some(descriptor) = self.registry.get(identifier) else {
            return self.suggest(identifier, actor_id).await;
        };

        let parsed = if self.strict_arity {
            descriptor.schema().parse_strict(&tokens)
        } else {
            descriptor.schema().parse(&tokens)
        };

        let args = match parsed {
            Ok(args) => args,
            Err(error) => {
                debug!(command = identifier, %error, "Invalid usage");
                self.notify(actor_id, INVALID_USAGE).await;
                return Outcome::InvalidUsage {
                    command: identifier.to_string(),
                    error,
                };
            }
        };

        if descriptor.is_privileged() && !is_admin {
            debug!(command = identifier, "Privileged command refused");
            self.notify(actor_id, ADMINS_ONLY).await;
            return Outcome::AdminsOnly {
                command: identifier.to_string(),
            };
        }

        debug!(command = identifier, tokens = tokens.len(), "Invoking command");
        let ctx = CommandContext::new(
            actor_id,
            identifier,
            tokens,
            args,
            is_admin,
            Arc::clone(&self.messenger),
            Arc::clone(&self.state),
        );
        (descriptor.handler())(ctx).await;

        Outcome::Invoked {
            command: identifier.to_string(),
        }
    }

    /// Suggests registered commands close to `identifier`.
    ///
    /// Sends nothing when no candidate clears the threshold.
    pub async fn suggest(&self, identifier: &str, actor_id: &str) -> Outcome {
        let suggestions = self
            .suggester
            .suggest(identifier, self.registry.identifiers());

        match render_suggestions(self.registry.delimiter(), &suggestions) {
            Some(text) => {
                debug!(input = identifier, count = suggestions.len(), "Suggesting");
                self.notify(actor_id, &text).await;
                Outcome::Suggested {
                    candidates: suggestions.into_iter().map(|s| s.identifier).collect(),
                }
            }
            None => {
                trace!(input = identifier, "No close command");
                Outcome::Silent
            }
        }
    }

    /// Sends one message, logging delivery failures.
    pub(crate) async fn notify(&self, actor_id: &str, text: &str) {
        if let Err(e) = self.messenger.send(actor_id, text).await {
            warn!(actor = %actor_id, error = %e, "Failed to send message");
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("commands", &self.registry.len())
            .field("admins", &self.admins.len())
            .field("suggester", &self.suggester)
            .field("strict_arity", &self.strict_arity)
            .finish_non_exhaustive()
    }
}
