//! Pluggable map-rendering engines.
//!
//! The controller never talks to a concrete SDK. It talks to a [`MapEngine`],
//! which reports which entry points it has, answers an availability check,
//! and constructs [`MapView`]s. Any engine offering a view, a camera and the
//! overlay primitives can be plugged in; [`SimulatedEngine`] ships with the
//! crate for headless use and tests.
//!
//! # Lifecycle
//!
//! ```text
//! capabilities() ──► check_availability() ──► create_view(ViewSpec)
//!                                                  │
//!                     EngineEventSink ◄────────────┘ style_loaded / render_error
//! ```

mod simulated;

pub use simulated::{SimulatedEngine, SimulatedEngineBuilder, SimulatedView};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::camera::{BoundsRequest, CameraCommand, CameraState};
use crate::coord::Coordinate;
use crate::overlay::{Overlay, OverlayPrimitive};

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors raised by engine implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The view could not be constructed.
    #[error("view construction failed: {0}")]
    Construction(String),

    /// A camera or bounds command was rejected.
    #[error("command rejected: {0}")]
    Command(String),

    /// The view failed while drawing.
    #[error("render failed: {0}")]
    Render(String),
}

/// Entry points an engine exposes.
///
/// `view` and `camera` are required for the map to be considered available.
/// The remaining primitives only gate the matching overlay kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineCapabilities {
    pub view: bool,
    pub camera: bool,
    pub user_location: bool,
    pub point_annotation: bool,
    pub shape_layer: bool,
}

impl EngineCapabilities {
    /// Every entry point present.
    pub fn full() -> Self {
        Self {
            view: true,
            camera: true,
            user_location: true,
            point_annotation: true,
            shape_layer: true,
        }
    }

    /// No entry points at all, e.g. the native module failed to load.
    pub fn none() -> Self {
        Self {
            view: false,
            camera: false,
            user_location: false,
            point_annotation: false,
            shape_layer: false,
        }
    }

    /// Whether the primitive for an overlay kind is present.
    pub fn supports(&self, primitive: OverlayPrimitive) -> bool {
        match primitive {
            OverlayPrimitive::PointAnnotation => self.point_annotation,
            OverlayPrimitive::ShapeLayer => self.shape_layer,
            OverlayPrimitive::UserLocation => self.user_location,
        }
    }
}

impl Default for EngineCapabilities {
    fn default() -> Self {
        Self::full()
    }
}

/// Decide availability from platform support and entry points.
///
/// Returns the human-readable reason when the engine cannot be used.
pub fn assess(platform_supported: bool, caps: &EngineCapabilities) -> Result<(), String> {
    if !platform_supported {
        return Err("Maps are not supported on this platform".to_string());
    }
    if !caps.view {
        return Err("Map view component is not available".to_string());
    }
    if !caps.camera {
        return Err("Map camera component is not available".to_string());
    }
    Ok(())
}

/// Receives asynchronous signals from a live view.
pub trait EngineEventSink: Send + Sync {
    /// The view finished loading its style.
    fn style_loaded(&self);

    /// The view failed while drawing.
    fn render_error(&self, message: String);
}

/// Everything an engine needs to construct a view.
#[derive(Clone)]
pub struct ViewSpec {
    pub center: Coordinate,
    pub zoom_level: f64,
    pub style_url: String,
    pub compass: bool,
    pub attribution: bool,
    pub logo: bool,
    /// Where the view reports load completion and render failures.
    pub events: Arc<dyn EngineEventSink>,
}

impl std::fmt::Debug for ViewSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewSpec")
            .field("center", &self.center)
            .field("zoom_level", &self.zoom_level)
            .field("style_url", &self.style_url)
            .field("compass", &self.compass)
            .field("attribution", &self.attribution)
            .field("logo", &self.logo)
            .finish_non_exhaustive()
    }
}

/// A map-rendering capability.
pub trait MapEngine: Send + Sync {
    /// Engine name for logs.
    fn name(&self) -> &str;

    /// Entry points present in this engine.
    fn capabilities(&self) -> EngineCapabilities;

    /// Whether the current platform can run this engine.
    fn platform_supported(&self) -> bool {
        true
    }

    /// One-shot availability check performed at mount.
    ///
    /// The default implementation resolves immediately from
    /// [`platform_supported`](Self::platform_supported) and
    /// [`capabilities`](Self::capabilities). Engines that need to probe a
    /// native module override this; it may take arbitrarily long.
    fn check_availability(&self) -> BoxFuture<'_, Result<(), String>> {
        let verdict = assess(self.platform_supported(), &self.capabilities());
        Box::pin(async move { verdict })
    }

    /// Construct a live view. May fail or panic; the controller guards both.
    fn create_view(&self, spec: ViewSpec) -> Result<Box<dyn MapView>, EngineError>;
}

/// A constructed, mountable map view.
pub trait MapView: Send {
    /// Move the camera.
    fn set_camera(&mut self, command: &CameraCommand) -> Result<(), EngineError>;

    /// Frame a bounding box.
    fn fit_bounds(&mut self, bounds: &BoundsRequest, duration_ms: u64) -> Result<(), EngineError>;

    /// Replace the mounted overlays.
    fn mount_overlays(&mut self, overlays: &[Overlay]) -> Result<(), EngineError>;

    /// Current camera position.
    fn camera(&self) -> CameraState;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assess_full_capabilities() {
        assert!(assess(true, &EngineCapabilities::full()).is_ok());
    }

    #[test]
    fn test_assess_unsupported_platform_wins() {
        let reason = assess(false, &EngineCapabilities::full()).unwrap_err();
        assert!(reason.contains("platform"));
    }

    #[test]
    fn test_assess_missing_view() {
        let caps = EngineCapabilities {
            view: false,
            ..EngineCapabilities::full()
        };
        let reason = assess(true, &caps).unwrap_err();
        assert!(reason.contains("view"));
    }

    #[test]
    fn test_assess_missing_overlay_primitives_still_available() {
        let caps = EngineCapabilities {
            point_annotation: false,
            shape_layer: false,
            user_location: false,
            ..EngineCapabilities::full()
        };
        assert!(assess(true, &caps).is_ok());
        assert!(!caps.supports(OverlayPrimitive::ShapeLayer));
    }
}
