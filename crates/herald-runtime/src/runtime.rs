//! Runtime orchestration.
//!
//! [`HeraldRuntime`] wires configuration, logging, the language table, the
//! command registry and the collaborators into a [`Dispatcher`], then feeds
//! it incoming messages, one task per message.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use herald_runtime::HeraldRuntime;
//!
//! let runtime = HeraldRuntime::builder()
//!     .config_file("herald.toml")
//!     .messenger(messenger)
//!     .command(|lang| {
//!         command("stock")
//!             .describe(lang, "StockDescription", &[])
//!             .handler(stock)
//!     })
//!     .build()?;
//!
//! runtime.run(incoming).await;
//! ```

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::signal;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::config::{ConfigLoader, HeraldConfig, validate_config};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;
use herald_core::{
    BoxedMessenger, BoxedProfileStore, LanguageTable, MemoryProfileStore, TextResolver,
};
use herald_framework::{
    CommandDescriptor, Dispatcher, Outcome, Registry, RegistryResult, StateMap,
};

/// One decoded message delivered by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Opaque identity of the sender.
    pub actor_id: String,
    /// The raw text.
    pub text: String,
}

impl IncomingMessage {
    /// Creates a message.
    pub fn new(actor_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            text: text.into(),
        }
    }
}

/// Produces a descriptor once the language table is loaded.
pub type CommandFactory =
    Box<dyn FnOnce(&dyn TextResolver) -> RegistryResult<CommandDescriptor> + Send>;

/// The assembled dispatcher plus the configuration it was built from.
pub struct HeraldRuntime {
    config: HeraldConfig,
    language: LanguageTable,
    dispatcher: Dispatcher,
}

impl HeraldRuntime {
    /// Creates a runtime builder.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HeraldConfig {
        &self.config
    }

    /// Returns the language table.
    pub fn language(&self) -> &LanguageTable {
        &self.language
    }

    /// Returns the dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Dispatches one message on the current task.
    pub async fn on_message(&self, actor_id: &str, text: &str) -> Outcome {
        self.dispatcher.on_message(actor_id, text).await
    }

    /// Dispatches one message on its own task.
    ///
    /// A panicking handler only fails the returned handle.
    pub fn handle_message(&self, message: IncomingMessage) -> JoinHandle<Outcome> {
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            dispatcher
                .on_message(&message.actor_id, &message.text)
                .await
        })
    }

    /// Dispatches messages until the stream ends or Ctrl+C / SIGTERM.
    ///
    /// Returns the number of messages received.
    pub async fn run<S>(&self, incoming: S) -> usize
    where
        S: Stream<Item = IncomingMessage> + Unpin,
    {
        info!("Herald is running. Press Ctrl+C to stop.");
        self.run_until(incoming, wait_for_shutdown()).await
    }

    /// Dispatches messages until the stream ends or `shutdown` completes.
    ///
    /// Messages already dispatched are allowed to finish before returning.
    pub async fn run_until<S, F>(&self, mut incoming: S, shutdown: F) -> usize
    where
        S: Stream<Item = IncomingMessage> + Unpin,
        F: Future<Output = ()>,
    {
        let mut tasks = JoinSet::new();
        let mut received = 0usize;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down");
                    break;
                }
                next = incoming.next() => match next {
                    Some(message) => {
                        received += 1;
                        let dispatcher = self.dispatcher.clone();
                        tasks.spawn(async move {
                            dispatcher.on_message(&message.actor_id, &message.text).await
                        });
                    }
                    None => {
                        debug!("Incoming stream closed");
                        break;
                    }
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    log_joined(joined);
                }
            }
        }

        if !tasks.is_empty() {
            debug!(in_flight = tasks.len(), "Waiting for in-flight messages");
        }
        while let Some(joined) = tasks.join_next().await {
            log_joined(joined);
        }

        info!(received, "Herald stopped");
        received
    }
}

impl std::fmt::Debug for HeraldRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeraldRuntime")
            .field("config", &self.config)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

fn log_joined(joined: Result<Outcome, JoinError>) {
    match joined {
        Ok(outcome) => debug!(?outcome, "Message handled"),
        Err(e) if e.is_panic() => error!("Message task panicked"),
        Err(e) => warn!(error = %e, "Message task did not complete"),
    }
}

/// Waits for Ctrl+C or, on Unix, SIGTERM.
pub async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C"),
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to register SIGTERM handler");
                ctrl_c.await;
                info!("Received Ctrl+C");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
        info!("Received Ctrl+C");
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for [`HeraldRuntime`].
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
    config: Option<HeraldConfig>,
    init_logging: bool,
    messenger: Option<BoxedMessenger>,
    profiles: Option<BoxedProfileStore>,
    commands: Vec<CommandFactory>,
    state: StateMap,
}

impl RuntimeBuilder {
    /// Creates a builder that searches the current directory for config.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
            config: None,
            init_logging: true,
            messenger: None,
            profiles: None,
            commands: Vec::new(),
            state: StateMap::new(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g. "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges configuration over every loaded source.
    pub fn merge(mut self, config: HeraldConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Uses `config` as is, skipping all loading.
    pub fn config(mut self, config: HeraldConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Leaves the global `tracing` subscriber alone.
    pub fn without_logging(mut self) -> Self {
        self.init_logging = false;
        self
    }

    /// Sets the messenger used for every reply.
    pub fn messenger(mut self, messenger: BoxedMessenger) -> Self {
        self.messenger = Some(messenger);
        self
    }

    /// Sets the profile store. Defaults to a [`MemoryProfileStore`].
    pub fn profiles(mut self, profiles: BoxedProfileStore) -> Self {
        self.profiles = Some(profiles);
        self
    }

    /// Registers a command. The factory receives the loaded language table.
    pub fn command<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(&dyn TextResolver) -> RegistryResult<CommandDescriptor> + Send + 'static,
    {
        self.commands.push(Box::new(factory));
        self
    }

    /// Adds shared state readable by handlers.
    pub fn state<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.state.insert(value);
        self
    }

    /// Loads and validates configuration, initializes logging, registers
    /// commands and builds the dispatcher.
    pub fn build(self) -> RuntimeResult<HeraldRuntime> {
        let config = match self.config {
            Some(config) => config,
            None => self.config_loader.load()?,
        };
        validate_config(&config)?;

        if self.init_logging {
            logging::init_from_config(&config.logging);
        }

        let messenger = self.messenger.ok_or(RuntimeError::MissingMessenger)?;
        let profiles = self
            .profiles
            .unwrap_or_else(|| Arc::new(MemoryProfileStore::new()) as BoxedProfileStore);

        let language = load_language(config.language.path.as_deref())?;

        let descriptors = self
            .commands
            .into_iter()
            .map(|factory| factory(&language))
            .collect::<RegistryResult<Vec<_>>>()?;
        let registry = Registry::build(config.dispatch.delimiter.clone(), descriptors)?;

        info!(
            commands = registry.len(),
            delimiter = %registry.delimiter(),
            admins = config.dispatch.admins.len(),
            "Runtime initialized"
        );

        let mut state = self.state;
        if state.get::<LanguageTable>().is_none() {
            state.insert(language.clone());
        }

        let dispatcher = Dispatcher::builder(registry, messenger, profiles)
            .options(config.dispatch.to_options())
            .state_map(state)
            .build();

        Ok(HeraldRuntime {
            config,
            language,
            dispatcher,
        })
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn load_language(path: Option<&Path>) -> RuntimeResult<LanguageTable> {
    let Some(path) = path else {
        debug!("No language file configured");
        return Ok(LanguageTable::new());
    };

    let json = std::fs::read_to_string(path).map_err(|source| RuntimeError::LanguageRead {
        path: path.to_path_buf(),
        source,
    })?;
    let table = LanguageTable::from_json_str(&json).map_err(|source| RuntimeError::Language {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), entries = table.len(), "Loaded language file");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use figment::Jail;
    use herald_core::RecordingMessenger;
    use herald_framework::{ArgType, CommandContext, command};

    fn config() -> HeraldConfig {
        let mut config = HeraldConfig::default();
        config.dispatch.admins = vec!["1".into()];
        config
    }

    fn runtime(messenger: Arc<RecordingMessenger>) -> HeraldRuntime {
        HeraldRuntime::builder()
            .config(config())
            .without_logging()
            .messenger(messenger)
            .command(|lang| {
                command("stock")
                    .describe(lang, "StockDescription", &[])
                    .handler(|_ctx: CommandContext| async { "3 keys left" })
            })
            .command(|_| {
                command("ban")
                    .privileged()
                    .required(ArgType::Text)
                    .optional(ArgType::Integer)
                    .description("Ban a user")
                    .handler(|ctx: CommandContext| async move {
                        format!("Banned {}", ctx.args().text(0).unwrap_or_default())
                    })
            })
            .command(|_| {
                command("crash").handler(|_ctx: CommandContext| async {
                    panic!("handler bug");
                    #[allow(unreachable_code)]
                    ()
                })
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_on_message() {
        let messenger = Arc::new(RecordingMessenger::new());
        let runtime = runtime(messenger.clone());

        let outcome = runtime.on_message("1", "!ban 123456 7").await;

        assert_eq!(
            outcome,
            Outcome::Invoked {
                command: "ban".into()
            }
        );
        assert_eq!(messenger.sent_to("1"), vec!["Banned 123456"]);
    }

    #[tokio::test]
    async fn test_handle_message_spawns() {
        let messenger = Arc::new(RecordingMessenger::new());
        let runtime = runtime(messenger.clone());

        let outcome = runtime
            .handle_message(IncomingMessage::new("2", "!stock"))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Invoked { .. }));
        assert_eq!(messenger.sent_to("2"), vec!["3 keys left"]);
    }

    #[tokio::test]
    async fn test_panicking_handler_does_not_stop_others() {
        let messenger = Arc::new(RecordingMessenger::new());
        let runtime = runtime(messenger.clone());

        let incoming = futures::stream::iter(vec![
            IncomingMessage::new("2", "!crash"),
            IncomingMessage::new("3", "!stock"),
            IncomingMessage::new("4", "hello"),
        ]);
        let received = runtime
            .run_until(incoming, std::future::pending::<()>())
            .await;

        assert_eq!(received, 3);
        assert_eq!(messenger.sent_to("3"), vec!["3 keys left"]);
        assert!(messenger.sent_to("4").is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_stops_reading() {
        let messenger = Arc::new(RecordingMessenger::new());
        let runtime = runtime(messenger.clone());

        let received = runtime
            .run_until(futures::stream::pending(), async {})
            .await;

        assert_eq!(received, 0);
    }

    #[test]
    fn test_language_file_feeds_descriptions() {
        Jail::expect_with(|jail| {
            jail.create_file("en.json", r#"{ "StockDescription": "Show current stock" }"#)?;

            let mut config = config();
            config.language.path = Some(jail.directory().join("en.json"));

            let runtime = HeraldRuntime::builder()
                .config(config)
                .without_logging()
                .messenger(Arc::new(RecordingMessenger::new()))
                .command(|lang| {
                    command("stock")
                        .describe(lang, "StockDescription", &[])
                        .handler(|_ctx: CommandContext| async {})
                })
                .build()
                .map_err(|e| e.to_string())?;

            assert_eq!(
                runtime.dispatcher().registry().help(),
                "!stock -> Show current stock"
            );
            assert_eq!(runtime.language().len(), 1);
            Ok(())
        });
    }

    #[test]
    fn test_missing_language_file() {
        let mut config = config();
        config.language.path = Some("/nonexistent/en.json".into());

        let result = HeraldRuntime::builder()
            .config(config)
            .without_logging()
            .messenger(Arc::new(RecordingMessenger::new()))
            .build();

        assert!(matches!(result, Err(RuntimeError::LanguageRead { .. })));
    }

    #[test]
    fn test_build_errors() {
        let missing = HeraldRuntime::builder()
            .config(config())
            .without_logging()
            .build();
        assert!(matches!(missing, Err(RuntimeError::MissingMessenger)));

        let mut bad = config();
        bad.dispatch.delimiter = String::new();
        let invalid = HeraldRuntime::builder()
            .config(bad)
            .without_logging()
            .messenger(Arc::new(RecordingMessenger::new()))
            .build();
        assert!(matches!(
            invalid,
            Err(RuntimeError::Config(ConfigError::InvalidDelimiter(_)))
        ));

        let duplicate = HeraldRuntime::builder()
            .config(config())
            .without_logging()
            .messenger(Arc::new(RecordingMessenger::new()))
            .command(|_| command("stock").handler(|_ctx: CommandContext| async {}))
            .command(|_| command("stock").handler(|_ctx: CommandContext| async {}))
            .build();
        assert!(matches!(duplicate, Err(RuntimeError::Registry(_))));
    }
}
