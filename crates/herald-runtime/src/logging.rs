//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! ```rust,ignore
//! use herald_runtime::logging::{LoggingBuilder, SpanEvents};
//!
//! // From the `[logging]` section
//! herald_runtime::logging::init_from_config(&config.logging);
//!
//! // Or by hand
//! LoggingBuilder::new()
//!     .directive("herald_framework=debug")
//!     .span_events(SpanEvents::lifecycle())
//!     .init();
//! ```
//!
//! `RUST_LOG`, when set, replaces the base level; configured per-module
//! filters are added on top.

use std::path::{Path, PathBuf};

use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{LogFormat, LogOutput, LoggingConfig, SpanEventConfig};

const DEFAULT_LOG_FILE: &str = "herald.log";

/// Which span events become log lines.
///
/// Each dispatched message runs inside a `dispatch` span carrying the actor
/// id; [`lifecycle`](Self::lifecycle) shows when each one starts and ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanEvents(FmtSpan);

impl SpanEvents {
    pub fn none() -> Self {
        Self(FmtSpan::NONE)
    }

    /// Creation and close.
    pub fn lifecycle() -> Self {
        Self(FmtSpan::NEW | FmtSpan::CLOSE)
    }

    pub fn full() -> Self {
        Self(FmtSpan::FULL)
    }
}

impl Default for SpanEvents {
    fn default() -> Self {
        Self::none()
    }
}

impl From<&SpanEventConfig> for SpanEvents {
    fn from(config: &SpanEventConfig) -> Self {
        [
            (config.new, FmtSpan::NEW),
            (config.enter, FmtSpan::ENTER),
            (config.exit, FmtSpan::EXIT),
            (config.close, FmtSpan::CLOSE),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .fold(Self::none(), |Self(acc), (_, flag)| Self(acc | flag))
    }
}

/// Installs the global subscriber described by `config`.
///
/// Does nothing if one is already installed.
pub fn init_from_config(config: &LoggingConfig) {
    LoggingBuilder::from_config(config).init();
}

/// Assembles a `fmt` layer plus an [`EnvFilter`].
#[derive(Debug)]
pub struct LoggingBuilder {
    level: tracing::Level,
    directives: Vec<String>,
    span_events: SpanEvents,
    format: LogFormat,
    output: LogOutput,
    file_path: Option<PathBuf>,
    target: bool,
    thread_ids: bool,
    file_location: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingBuilder {
    /// Compact lines on stdout at `INFO`.
    pub fn new() -> Self {
        Self {
            level: tracing::Level::INFO,
            directives: Vec::new(),
            span_events: SpanEvents::none(),
            format: LogFormat::Compact,
            output: LogOutput::Stdout,
            file_path: None,
            target: true,
            thread_ids: false,
            file_location: false,
        }
    }

    pub fn from_config(config: &LoggingConfig) -> Self {
        let directives = config
            .filters
            .iter()
            .map(|(module, level)| format!("{module}={}", level.to_lowercase()))
            .collect();

        Self {
            level: config.level.to_tracing_level(),
            directives,
            span_events: SpanEvents::from(&config.span_events),
            format: config.format,
            output: config.output,
            file_path: config.file_path.clone(),
            thread_ids: config.thread_ids,
            file_location: config.file_location,
            ..Self::new()
        }
    }

    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = level;
        self
    }

    /// Adds a filter directive such as `herald_framework=trace`.
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    pub fn span_events(mut self, events: SpanEvents) -> Self {
        self.span_events = events;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Log file for [`LogOutput::File`].
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.target = enabled;
        self
    }

    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.thread_ids = enabled;
        self
    }

    /// Include source file and line number.
    pub fn with_file_location(mut self, enabled: bool) -> Self {
        self.file_location = enabled;
        self
    }

    /// `RUST_LOG` or the base level, plus every valid directive.
    pub fn build_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_lowercase()));

        for directive in &self.directives {
            match directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(e) => eprintln!("Ignoring invalid log directive '{directive}': {e}"),
            }
        }
        filter
    }

    /// Builds the formatting layer without installing it.
    pub fn layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync + 'static>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        let writes_file = self.output == LogOutput::File;
        let layer = fmt::layer()
            .with_writer(self.make_writer())
            .with_ansi(!writes_file)
            .with_span_events(self.span_events.0.clone())
            .with_target(self.target)
            .with_thread_ids(self.thread_ids)
            .with_file(self.file_location)
            .with_line_number(self.file_location);

        match self.format {
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Pretty => layer.pretty().boxed(),
            LogFormat::Full => layer.boxed(),
            #[cfg(feature = "json-log")]
            LogFormat::Json => layer.json().boxed(),
            // Rejected by validation; kept readable if validation was skipped.
            #[cfg(not(feature = "json-log"))]
            LogFormat::Json => layer.boxed(),
        }
    }

    fn make_writer(&self) -> BoxMakeWriter {
        match (self.output, &self.file_path) {
            (LogOutput::Stdout, _) => BoxMakeWriter::new(std::io::stdout),
            (LogOutput::Stderr, _) => BoxMakeWriter::new(std::io::stderr),
            (LogOutput::File, Some(path)) => {
                let dir = path
                    .parent()
                    .filter(|dir| !dir.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                let name = path
                    .file_name()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
                BoxMakeWriter::new(tracing_appender::rolling::never(dir, name))
            }
            (LogOutput::File, None) => {
                eprintln!("File logging requested without a file path, logging to stdout");
                BoxMakeWriter::new(std::io::stdout)
            }
        }
    }

    /// Installs the subscriber, ignoring one that is already installed.
    pub fn init(self) {
        let _ = self.try_init();
    }

    pub fn try_init(self) -> Result<(), TryInitError> {
        tracing_subscriber::registry()
            .with(self.layer::<Registry>())
            .with(self.build_filter())
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use figment::Jail;

    #[test]
    fn test_span_events_from_config() {
        let lifecycle = SpanEventConfig {
            new: true,
            close: true,
            ..Default::default()
        };
        assert_eq!(SpanEvents::from(&lifecycle), SpanEvents::lifecycle());
        assert_eq!(
            SpanEvents::from(&SpanEventConfig::default()),
            SpanEvents::none()
        );
    }

    #[test]
    fn test_builder_from_config() {
        let mut config = LoggingConfig {
            level: LogLevel::Debug,
            thread_ids: true,
            file_location: true,
            ..Default::default()
        };
        config
            .filters
            .insert("herald_framework".into(), "TRACE".into());

        let builder = LoggingBuilder::from_config(&config);

        assert_eq!(builder.level, tracing::Level::DEBUG);
        assert_eq!(builder.directives, vec!["herald_framework=trace"]);
        assert!(builder.thread_ids);
        assert!(builder.file_location);
        assert!(builder.target);
    }

    #[test]
    fn test_every_format_builds_a_layer() {
        for format in [
            LogFormat::Compact,
            LogFormat::Full,
            LogFormat::Pretty,
            LogFormat::Json,
        ] {
            let builder = LoggingBuilder::new().format(format);
            let subscriber = tracing_subscriber::registry().with(builder.layer::<Registry>());
            tracing::subscriber::with_default(subscriber, || tracing::info!("formatted"));
        }
    }

    #[test]
    fn test_file_output_writes_lines() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join("herald.log");
            let builder = LoggingBuilder::new()
                .output(LogOutput::File)
                .file_path(&path);

            let subscriber = tracing_subscriber::registry().with(builder.layer::<Registry>());
            tracing::subscriber::with_default(subscriber, || {
                tracing::info!(actor = "42", "message dispatched");
            });

            let written = std::fs::read_to_string(&path).map_err(|e| e.to_string())?;
            assert!(written.contains("message dispatched"));
            assert!(written.contains("actor=\"42\""));
            Ok(())
        });
    }
}
