//! Logging setup.
//!
//! Installs a `tracing` subscriber writing to stderr and, when a directory is
//! configured, to a daily rolling file through a non-blocking writer. The
//! returned [`LoggingGuard`] must be held for the life of the process or
//! buffered file output is lost.
//!
//! `RUST_LOG` overrides the configured level when set.

use std::path::PathBuf;

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSettings;

/// Log file name prefix; the appender adds the date.
pub const LOG_FILE_PREFIX: &str = "ridemap.log";

/// Errors installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The level string is not a valid filter directive.
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    /// The log directory could not be created.
    #[error("Failed to create log directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// What to log and where.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive such as `info` or `ridemap=debug,warn`.
    pub level: String,
    /// Directory for rolling files; stderr only when `None`.
    pub directory: Option<PathBuf>,
    /// Colorize stderr output.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            ansi: true,
        }
    }
}

impl From<&LoggingSettings> for LoggingConfig {
    fn from(settings: &LoggingSettings) -> Self {
        Self {
            level: settings.level.clone(),
            directory: settings.directory.clone(),
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// Raise the level to `debug` for ridemap targets.
    pub fn verbose(mut self) -> Self {
        self.level = format!("{},ridemap=debug", self.level);
        self
    }

    /// Build the filter: `RUST_LOG` first, then the configured level.
    pub fn filter(&self) -> Result<EnvFilter, LoggingError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.level).map_err(|e| LoggingError::InvalidFilter {
            filter: self.level.clone(),
            reason: e.to_string(),
        })
    }
}

/// Keeps the file writer flushing until dropped.
#[derive(Debug)]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError> {
    let filter = config.filter()?;

    // Local offset can be indeterminate on multi-threaded Unix; fall back to UTC.
    let timer = OffsetTime::local_rfc_3339()
        .unwrap_or_else(|_| OffsetTime::new(UtcOffset::UTC, Rfc3339));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_timer(timer.clone());

    let (file_layer, guard) = match &config.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::Directory {
                path: dir.clone(),
                source,
            })?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(timer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!(
        level = %config.level,
        directory = ?config.directory,
        "Logging initialized"
    );

    Ok(LoggingGuard { _file: guard })
}
