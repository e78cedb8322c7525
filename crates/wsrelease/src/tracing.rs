//! Log output for the wsrelease CLI
//!
//! Events go to stderr; stdout carries only the command's result text.

use std::io;
pub use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// How log lines are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TracingFormat {
    /// Multi-line, human-readable
    Pretty,
    /// One line per event
    #[default]
    Compact,
    /// One JSON object per event
    Json,
    /// Targets plus source file and line
    Dev,
}

/// Verbosity selected with `--level`
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevel {
    /// Everything, including per-dependency detail
    Trace,
    /// Per-package progress
    Debug,
    /// One line per pass
    Info,
    /// Problems only (default)
    Warn,
    /// Failures only
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// Subscriber settings derived from the global flags
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Rendering of each event
    pub format: TracingFormat,
    /// Level used when `RUST_LOG` is unset
    pub level: Level,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            format: TracingFormat::Compact,
            level: Level::WARN,
        }
    }
}

static CORRELATION_ID: std::sync::OnceLock<Uuid> = std::sync::OnceLock::new();

/// Identifier attached to every run, stable for the life of the process
pub fn correlation_id() -> Uuid {
    *CORRELATION_ID.get_or_init(Uuid::new_v4)
}

/// Filter directive limiting output to this tool's crates at `level`.
fn level_directive(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    format!("wsrelease={level},wsrelease_workspaces={level}")
}

/// Builds the filter: `RUST_LOG` when set, otherwise the configured level.
fn build_filter(level: Level) -> miette::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level_directive(level)))
        .map_err(|e| miette::miette!("Failed to create tracing filter: {e}"))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if the level directive cannot be parsed into a filter.
pub fn init_tracing(config: TracingConfig) -> miette::Result<()> {
    let registry = tracing_subscriber::registry().with(build_filter(config.level)?);
    let layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);

    match config.format {
        TracingFormat::Pretty => registry.with(layer.pretty()).init(),
        TracingFormat::Compact => registry.with(layer.compact().with_target(false)).init(),
        TracingFormat::Json => registry
            .with(layer.json().with_current_span(true).with_span_list(true))
            .init(),
        TracingFormat::Dev => registry
            .with(layer.with_file(true).with_line_number(true).with_target(true))
            .init(),
    }

    tracing::info!(
        correlation_id = %correlation_id(),
        version = env!("CARGO_PKG_VERSION"),
        format = ?config.format,
        "Tracing initialized for wsrelease"
    );

    Ok(())
}
