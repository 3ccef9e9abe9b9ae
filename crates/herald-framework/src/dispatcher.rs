//! The dispatcher entry point.
//!
//! [`Dispatcher::on_message`] is the one thing a transport calls. For every
//! incoming line it:
//!
//! 1. splits the text into an [`Invocation`],
//! 2. looks up (or creates) the sender's profile,
//! 3. rejects blocked senders with a single notice,
//! 4. records the interaction,
//! 5. routes command-form messages and offers suggestions for plain text.
//!
//! ```rust,ignore
//! use herald_framework::{Dispatcher, Registry};
//!
//! let dispatcher = Dispatcher::builder(registry, messenger, profiles)
//!     .admins(["1234"])
//!     .state(shop)
//!     .build();
//!
//! dispatcher.on_message("1234", "!ban 5678 7").await;
//! ```
//!
//! `Dispatcher` is cheap to clone and `Send + Sync`; messages from different
//! actors may be dispatched concurrently.

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use tower::Service;
use tracing::{Instrument, debug_span, trace, warn};

use crate::command::Registry;
use crate::context::StateMap;
use crate::router::{AdminList, BLOCKED, DispatchOptions, INTERNAL_ERROR, Outcome, Router};
use crate::split::Invocation;
use herald_core::{BoxedMessenger, BoxedProfileStore};

struct DispatcherInner {
    router: Router,
    profiles: BoxedProfileStore,
}

/// Turns raw messages into routed commands.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl Dispatcher {
    /// Starts building a dispatcher.
    pub fn builder(
        registry: impl Into<Arc<Registry>>,
        messenger: BoxedMessenger,
        profiles: BoxedProfileStore,
    ) -> DispatcherBuilder {
        DispatcherBuilder {
            registry: registry.into(),
            messenger,
            profiles,
            options: DispatchOptions::default(),
            state: StateMap::new(),
        }
    }

    /// Returns the router.
    pub fn router(&self) -> &Router {
        &self.inner.router
    }

    /// Returns the registry.
    pub fn registry(&self) -> &Registry {
        self.inner.router.registry()
    }

    /// Handles one raw message from `actor_id`.
    pub async fn on_message(&self, actor_id: &str, text: &str) -> Outcome {
        let invocation = Invocation::parse(actor_id, text, self.registry().delimiter());
        self.dispatch(invocation).await
    }

    /// Handles an already split invocation.
    pub async fn dispatch(&self, invocation: Invocation) -> Outcome {
        let span = debug_span!("dispatch", actor = %invocation.actor_id);
        self.dispatch_inner(invocation).instrument(span).await
    }

    async fn dispatch_inner(&self, invocation: Invocation) -> Outcome {
        let Invocation {
            actor_id,
            identifier,
            tokens,
            is_command,
        } = invocation;
        let router = &self.inner.router;

        let profile = match self.inner.profiles.find_or_create(&actor_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "Profile lookup failed");
                router.notify(&actor_id, INTERNAL_ERROR).await;
                return Outcome::StoreUnavailable;
            }
        };

        if profile.is_blocked() {
            trace!("Blocked actor");
            router.notify(&actor_id, BLOCKED).await;
            return Outcome::Blocked;
        }

        if let Err(e) = self.inner.profiles.record_interaction(&actor_id).await {
            warn!(error = %e, "Failed to record interaction");
        }

        if is_command {
            router.route(&identifier, &actor_id, tokens).await
        } else {
            router.suggest(&identifier, &actor_id).await
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("router", &self.inner.router)
            .finish_non_exhaustive()
    }
}

impl Service<Invocation> for Dispatcher {
    type Response = Outcome;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Outcome, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, invocation: Invocation) -> Self::Future {
        let dispatcher = self.clone();
        Box::pin(async move { Ok(dispatcher.dispatch(invocation).await) })
    }
}

/// Builder returned by [`Dispatcher::builder`].
#[must_use = "call `.build()` to obtain the dispatcher"]
pub struct DispatcherBuilder {
    registry: Arc<Registry>,
    messenger: BoxedMessenger,
    profiles: BoxedProfileStore,
    options: DispatchOptions,
    state: StateMap,
}

impl DispatcherBuilder {
    /// Replaces all routing options.
    pub fn options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the admin list.
    pub fn admins<I, S>(mut self, admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.admins = admins.into_iter().collect::<AdminList>();
        self
    }

    /// Sets the suggestion threshold.
    pub fn suggest_threshold(mut self, threshold: u32) -> Self {
        self.options.suggest_threshold = threshold;
        self
    }

    /// Rejects tokens beyond a command's schema.
    pub fn strict_arity(mut self, strict: bool) -> Self {
        self.options.strict_arity = strict;
        self
    }

    /// Adds shared state readable by handlers through
    /// [`CommandContext::state`](crate::CommandContext::state).
    pub fn state<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.state.insert(value);
        self
    }

    /// Replaces the shared state with a prepared map.
    pub fn state_map(mut self, state: StateMap) -> Self {
        self.state = state;
        self
    }

    /// Builds the dispatcher.
    pub fn build(self) -> Dispatcher {
        let router = Router::new(
            self.registry,
            self.options,
            self.messenger,
            Arc::new(self.state),
        );

        Dispatcher {
            inner: Arc::new(DispatcherInner {
                router,
                profiles: self.profiles,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::command;
    use crate::context::CommandContext;
    use crate::schema::ArgType;
    use herald_core::{MemoryProfileStore, Profile, RecordingMessenger};
    use parking_lot::Mutex;
    use tower::ServiceExt;

    type Calls = Arc<Mutex<Vec<(String, Vec<String>)>>>;

    struct Shop {
        keys: u32,
    }

    struct Fixture {
        dispatcher: Dispatcher,
        messenger: Arc<RecordingMessenger>,
        profiles: Arc<MemoryProfileStore>,
        calls: Calls,
    }

    fn recorder(
        calls: &Calls,
    ) -> impl FnOnce(CommandContext) -> futures::future::Ready<()> + Clone + Send + Sync + 'static
    {
        let calls = Arc::clone(calls);
        move |ctx: CommandContext| {
            calls
                .lock()
                .push((ctx.command().to_string(), ctx.tokens().to_vec()));
            futures::future::ready(())
        }
    }

    fn fixture(profiles: MemoryProfileStore) -> Fixture {
        let calls: Calls = Arc::default();

        let registry = Registry::build(
            "!",
            [
                command("ban")
                    .privileged()
                    .required(ArgType::Text)
                    .optional(ArgType::Integer)
                    .description("Ban a user")
                    .handler(recorder(&calls))
                    .unwrap(),
                command("unban")
                    .privileged()
                    .required(ArgType::Text)
                    .description("Unban a user")
                    .handler(recorder(&calls))
                    .unwrap(),
                command("stock")
                    .description("Show stock")
                    .handler(|ctx: CommandContext| async move {
                        let shop = ctx.state::<Shop>()?;
                        Some(format!("{} keys left", shop.keys))
                    })
                    .unwrap(),
            ],
        )
        .unwrap();

        let messenger = Arc::new(RecordingMessenger::new());
        let profiles = Arc::new(profiles);
        let dispatcher = Dispatcher::builder(registry, messenger.clone(), profiles.clone())
            .admins(["1"])
            .state(Shop { keys: 3 })
            .build();

        Fixture {
            dispatcher,
            messenger,
            profiles,
            calls,
        }
    }

    #[tokio::test]
    async fn test_admin_ban_invokes_with_tokens() {
        let f = fixture(MemoryProfileStore::new());

        let outcome = f.dispatcher.on_message("1", "!ban 123456 7").await;

        assert_eq!(
            outcome,
            Outcome::Invoked {
                command: "ban".into()
            }
        );
        assert_eq!(
            *f.calls.lock(),
            vec![("ban".to_string(), vec!["123456".to_string(), "7".to_string()])]
        );
    }

    #[tokio::test]
    async fn test_non_admin_ban_is_refused() {
        let f = fixture(MemoryProfileStore::new());

        let outcome = f.dispatcher.on_message("2", "!ban 123456 7").await;

        assert!(matches!(outcome, Outcome::AdminsOnly { .. }));
        assert!(f.calls.lock().is_empty());
        assert_eq!(
            f.messenger.sent_to("2"),
            vec!["This command is for admins only!"]
        );
    }

    #[tokio::test]
    async fn test_plain_text_without_near_match_is_silent() {
        let f = fixture(MemoryProfileStore::new());

        let outcome = f.dispatcher.on_message("2", "hello").await;

        assert_eq!(outcome, Outcome::Silent);
        assert_eq!(f.messenger.count(), 0);
        assert_eq!(f.profiles.get("2").unwrap().interactions, 1);
    }

    #[tokio::test]
    async fn test_plain_text_typo_gets_suggestion() {
        let f = fixture(MemoryProfileStore::new());

        let outcome = f.dispatcher.on_message("2", "Stok please").await;

        assert_eq!(
            outcome,
            Outcome::Suggested {
                candidates: vec!["stock".into()]
            }
        );
        assert_eq!(
            f.messenger.sent_to("2"),
            vec!["↓ ↓ ↓\n\n★ Did you mean: ★\n✔ !stock"]
        );
    }

    #[tokio::test]
    async fn test_command_typo_gets_suggestion() {
        let f = fixture(MemoryProfileStore::new());

        let outcome = f.dispatcher.on_message("2", "!bam 1").await;

        assert_eq!(
            outcome,
            Outcome::Suggested {
                candidates: vec!["ban".into()]
            }
        );
    }

    #[tokio::test]
    async fn test_blocked_actor_gets_one_notice() {
        let mut blocked = Profile::new("9");
        blocked.blocked = true;
        let f = fixture(MemoryProfileStore::new().with_profile(blocked));

        let outcome = f.dispatcher.on_message("9", "!stock").await;

        assert_eq!(outcome, Outcome::Blocked);
        assert_eq!(f.messenger.sent_to("9"), vec!["You are banned."]);
        assert_eq!(f.profiles.get("9").unwrap().interactions, 0);
    }

    #[tokio::test]
    async fn test_store_failure_sends_internal_error() {
        let f = fixture(MemoryProfileStore::known_only());

        let outcome = f.dispatcher.on_message("2", "!stock").await;

        assert_eq!(outcome, Outcome::StoreUnavailable);
        assert_eq!(
            f.messenger.sent_to("2"),
            vec!["Internal Error, try adding me again!"]
        );
    }

    #[tokio::test]
    async fn test_help_documents() {
        let f = fixture(MemoryProfileStore::new());

        f.dispatcher.on_message("1", "!help").await;
        f.dispatcher.on_message("2", "!HELP").await;

        assert_eq!(
            f.messenger.sent_to("1"),
            vec!["!ban <text> <integer?> -> Ban a user\n!unban <text> -> Unban a user"]
        );
        assert_eq!(f.messenger.sent_to("2"), vec!["!stock -> Show stock"]);
    }

    #[tokio::test]
    async fn test_handler_reads_shared_state() {
        let f = fixture(MemoryProfileStore::new());

        f.dispatcher.on_message("2", "!stock").await;

        assert_eq!(f.messenger.sent_to("2"), vec!["3 keys left"]);
    }

    #[tokio::test]
    async fn test_tower_service() {
        let f = fixture(MemoryProfileStore::new());
        let invocation = Invocation::parse("1", "!unban 42", "!");

        let outcome = f.dispatcher.clone().oneshot(invocation).await.unwrap();

        assert_eq!(
            outcome,
            Outcome::Invoked {
                command: "unban".into()
            }
        );
    }

    #[test]
    fn test_dispatch_without_runtime_macros() {
        let f = fixture(MemoryProfileStore::new());

        let outcome = tokio_test::block_on(f.dispatcher.on_message("2", "!unban"));

        assert!(matches!(outcome, Outcome::InvalidUsage { .. }));
        assert_eq!(f.messenger.sent_to("2"), vec!["Invalid Usage!"]);
    }
}
