//! Shared setup for commands that do real work.

use ridemap::config::ConfigFile;
use ridemap::logging::{init_logging, LoggingConfig, LoggingGuard};
use tokio::runtime::Runtime;
use tracing::info;

use crate::error::CliError;

/// Loaded config, installed logging and a Tokio runtime.
pub struct CliRunner {
    config: ConfigFile,
    runtime: Runtime,
    _logging: LoggingGuard,
}

impl CliRunner {
    /// Load config (defaults if missing), install logging, start the runtime.
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let mut logging = LoggingConfig::from(&config.logging);
        if verbose {
            logging = logging.verbose();
        }
        let guard = init_logging(&logging)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("ridemap-worker")
            .build()
            .map_err(CliError::Runtime)?;

        Ok(Self {
            config,
            runtime,
            _logging: guard,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn log_startup(&self, command: &str) {
        info!(
            command,
            version = env!("CARGO_PKG_VERSION"),
            "ridemap starting"
        );
    }
}
