//! Host callback slots.

use super::error::MapError;

type ReadyFn = Box<dyn Fn() + Send + Sync>;
type ErrorFn = Box<dyn Fn(&MapError) + Send + Sync>;
type AvailabilityFn = Box<dyn Fn(bool) + Send + Sync>;

/// Optional callbacks fired by a controller.
///
/// Each fires at most once per mount and never after unmount.
#[derive(Default)]
pub struct MapCallbacks {
    pub(crate) on_map_ready: Option<ReadyFn>,
    pub(crate) on_error: Option<ErrorFn>,
    pub(crate) on_availability_change: Option<AvailabilityFn>,
}

impl MapCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when the engine reports its style finished loading.
    pub fn on_map_ready(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_map_ready = Some(Box::new(f));
        self
    }

    /// Called with the failure when the map cannot be shown.
    pub fn on_error(mut self, f: impl Fn(&MapError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Called with the outcome of the availability check.
    pub fn on_availability_change(mut self, f: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.on_availability_change = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for MapCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapCallbacks")
            .field("on_map_ready", &self.on_map_ready.is_some())
            .field("on_error", &self.on_error.is_some())
            .field(
                "on_availability_change",
                &self.on_availability_change.is_some(),
            )
            .finish()
    }
}

/// A callback invocation decided under the state lock, fired after it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Notice {
    Availability(bool),
    Error(MapError),
    Ready,
}

impl MapCallbacks {
    pub(crate) fn fire(&self, notice: &Notice) {
        match notice {
            Notice::Availability(available) => {
                if let Some(f) = &self.on_availability_change {
                    f(*available);
                }
            }
            Notice::Error(err) => {
                if let Some(f) = &self.on_error {
                    f(err);
                }
            }
            Notice::Ready => {
                if let Some(f) = &self.on_map_ready {
                    f();
                }
            }
        }
    }
}
