//! Logging setup for hosts embedding the declaration engine
//!
//! Thin configuration layer over the `tracing` ecosystem: structured
//! logging with selectable format and output, driven by an env-filter.

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with timestamps
    Pretty,
    /// Compact format for production
    Compact,
    /// JSON format for structured logging
    Json,
}

/// Log output destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level
    pub level: Level,
    /// Output format
    pub format: LogFormat,
    /// Output destination
    pub output: LogOutput,
    /// Whether to include span events
    pub span_events: bool,
    /// Custom filter directives (e.g., "optstruct=debug")
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            output: LogOutput::Stderr,
            span_events: false,
            filter: None,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// Initialize the global logging system.
pub fn init_logging(config: LogConfig) {
    let filter = build_filter(&config);
    let span_events = span_events_config(config.span_events);

    macro_rules! install {
        ($writer:expr) => {
            match config.format {
                LogFormat::Pretty => {
                    let layer = fmt::layer()
                        .with_writer($writer)
                        .pretty()
                        .with_span_events(span_events)
                        .with_filter(filter);
                    tracing_subscriber::registry().with(layer).init();
                }
                LogFormat::Compact => {
                    let layer = fmt::layer()
                        .with_writer($writer)
                        .compact()
                        .with_span_events(span_events)
                        .with_filter(filter);
                    tracing_subscriber::registry().with(layer).init();
                }
                LogFormat::Json => {
                    let layer = fmt::layer()
                        .with_writer($writer)
                        .json()
                        .with_span_events(span_events)
                        .with_filter(filter);
                    tracing_subscriber::registry().with(layer).init();
                }
            }
        };
    }

    match config.output {
        LogOutput::Stdout => install!(std::io::stdout),
        LogOutput::Stderr => install!(std::io::stderr),
    }
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    let base_filter = EnvFilter::from_default_env().add_directive(config.level.into());

    match &config.filter {
        Some(filter_str) => filter_str.split(',').fold(base_filter, |filter, directive| {
            filter.add_directive(directive.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid filter directive: {}", directive);
                config.level.into()
            }))
        }),
        None => base_filter,
    }
}

fn span_events_config(enabled: bool) -> FmtSpan {
    if enabled {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

/// Initialize logging with defaults for development
pub fn init_dev_logging() {
    init_logging(LogConfig {
        level: Level::DEBUG,
        format: LogFormat::Pretty,
        output: LogOutput::Stderr,
        span_events: true,
        filter: Some("optstruct=debug".to_string()),
    })
}
