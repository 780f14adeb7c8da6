//! Failure taxonomy for the map controller.
//!
//! None of these reach the caller as a `Result`. Engine and construction
//! failures are reported through `on_error`; suppressed commands are only
//! written to the diagnostic sink.

use thiserror::Error;

/// Errors the controller handles locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// The rendering capability is missing or the platform lacks support.
    #[error("Map engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine is present but failed while constructing or drawing the view.
    #[error("Map failed to render: {0}")]
    ConstructionFailure(String),

    /// An imperative command arrived while the engine was not ready.
    #[error("{command} suppressed: {reason}")]
    CommandSuppressed {
        command: &'static str,
        reason: String,
    },
}

impl MapError {
    /// The human-readable reason without the category prefix.
    pub fn reason(&self) -> &str {
        match self {
            MapError::EngineUnavailable(r) | MapError::ConstructionFailure(r) => r,
            MapError::CommandSuppressed { reason, .. } => reason,
        }
    }
}
