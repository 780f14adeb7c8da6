//! CLI error type.

use std::fmt;

use ridemap::config::ConfigError;
use ridemap::logging::LoggingError;
use ridemap::relay::RelayError;
use ridemap::rides::RideApiError;
use ridemap::session::SessionError;

/// Errors surfaced to the user; each maps to exit code 1.
#[derive(Debug)]
pub enum CliError {
    /// Bad configuration key or value.
    Config(String),
    /// Config file could not be read or written.
    ConfigFile(ConfigError),
    /// Logging could not be initialized.
    Logging(LoggingError),
    /// Tokio runtime could not be started.
    Runtime(std::io::Error),
    /// Invalid command-line input.
    InvalidArgument(String),
    /// Mock ride API failure.
    Rides(RideApiError),
    /// Echo relay failure.
    Relay(RelayError),
    /// Login or session storage failure.
    Session(SessionError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Configuration file error: {}", e),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Rides(e) => write!(f, "Ride API error: {}", e),
            CliError::Relay(e) => write!(f, "Relay error: {}", e),
            CliError::Session(e) => write!(f, "Session error: {}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<RideApiError> for CliError {
    fn from(e: RideApiError) -> Self {
        CliError::Rides(e)
    }
}

impl From<RelayError> for CliError {
    fn from(e: RelayError) -> Self {
        CliError::Relay(e)
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        CliError::Session(e)
    }
}
