//! Availability state of a mounted controller.
//!
//! # State Machine
//!
//! ```text
//! Checking --[entry points present]--------------> Available
//! Checking --[entry points absent / platform]----> Unavailable(reason)
//! Available --[view construction or draw fails]--> RenderFailed(reason)
//! ```
//!
//! `Unavailable` and `RenderFailed` are terminal for the mount. There is no
//! retry; a fresh mount starts again from `Checking`.

/// Where a controller is in its availability lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AvailabilityState {
    /// Initial state while the one-shot check runs.
    #[default]
    Checking,
    /// The engine is usable and a live view is (being) constructed.
    Available,
    /// The engine cannot be used at all.
    Unavailable(String),
    /// The engine was present but the live view failed.
    RenderFailed(String),
}

impl AvailabilityState {
    /// Whether the live map may be shown.
    pub fn is_available(&self) -> bool {
        matches!(self, AvailabilityState::Available)
    }

    /// Whether no further transition can happen in this mount.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AvailabilityState::Unavailable(_) | AvailabilityState::RenderFailed(_)
        )
    }

    /// Failure reason for the terminal states.
    pub fn reason(&self) -> Option<&str> {
        match self {
            AvailabilityState::Unavailable(r) | AvailabilityState::RenderFailed(r) => Some(r),
            _ => None,
        }
    }

    /// Short label for logs and status lines.
    pub fn display_status(&self) -> &'static str {
        match self {
            AvailabilityState::Checking => "checking",
            AvailabilityState::Available => "available",
            AvailabilityState::Unavailable(_) => "unavailable",
            AvailabilityState::RenderFailed(_) => "render failed",
        }
    }
}
