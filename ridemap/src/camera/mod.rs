//! Camera and bounds requests issued through a [`MapHandle`](crate::controller::MapHandle).
//!
//! Requests are transient values built per call. Optional fields resolve to the
//! defaults below when the request is applied, so hosting screens can write
//! `CameraRequest::centered(c).with_zoom(12.0)` and get the standard animation.

use serde::{Deserialize, Serialize};

use crate::coord::Coordinate;

/// Zoom applied when a camera request leaves it unset.
pub const DEFAULT_CAMERA_ZOOM: f64 = 15.0;

/// Animation duration applied when a camera request leaves it unset.
pub const DEFAULT_ANIMATION_MS: u64 = 500;

/// Padding in pixels applied to every side by `fit_bounds` when none is given.
pub const DEFAULT_FIT_PADDING_PX: f64 = 50.0;

/// How the engine moves between camera positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    /// Jump without animation.
    Instant,
    /// Linear ease to the target.
    Ease,
    /// Zoom out, pan, zoom in.
    #[default]
    Fly,
}

impl AnimationMode {
    /// Parse from a config string. Accepts the engine spellings too.
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "instant" | "none" | "moveto" => Some(AnimationMode::Instant),
            "ease" | "easeto" => Some(AnimationMode::Ease),
            "fly" | "flyto" => Some(AnimationMode::Fly),
            _ => None,
        }
    }
}

/// A request to reposition the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRequest {
    /// Target center.
    pub center: Coordinate,
    /// Target zoom; [`DEFAULT_CAMERA_ZOOM`] when `None`.
    pub zoom_level: Option<f64>,
    /// Animation length; [`DEFAULT_ANIMATION_MS`] when `None`.
    pub animation_duration_ms: Option<u64>,
    /// Animation style.
    pub animation_mode: AnimationMode,
}

impl CameraRequest {
    /// A request for `center` with every other field defaulted.
    pub fn centered(center: Coordinate) -> Self {
        Self {
            center,
            zoom_level: None,
            animation_duration_ms: None,
            animation_mode: AnimationMode::default(),
        }
    }

    /// Set the zoom level. Negative values clamp to zero.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom_level = Some(zoom.max(0.0));
        self
    }

    /// Set the animation duration.
    pub fn with_duration_ms(mut self, ms: u64) -> Self {
        self.animation_duration_ms = Some(ms);
        self
    }

    /// Set the animation mode.
    pub fn with_mode(mut self, mode: AnimationMode) -> Self {
        self.animation_mode = mode;
        self
    }

    /// Fill unset fields from the given defaults.
    pub fn resolve(&self, defaults: &CameraDefaults) -> CameraCommand {
        CameraCommand {
            center: self.center,
            zoom_level: self.zoom_level.unwrap_or(defaults.zoom_level),
            animation_duration_ms: self
                .animation_duration_ms
                .unwrap_or(defaults.animation_duration_ms),
            animation_mode: self.animation_mode,
        }
    }
}

/// Fallback values for camera requests that omit fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraDefaults {
    /// Zoom used when a request omits it.
    pub zoom_level: f64,
    /// Animation duration used when a request omits it.
    pub animation_duration_ms: u64,
    /// Uniform fit-bounds padding.
    pub fit_padding_px: f64,
}

impl Default for CameraDefaults {
    fn default() -> Self {
        Self {
            zoom_level: DEFAULT_CAMERA_ZOOM,
            animation_duration_ms: DEFAULT_ANIMATION_MS,
            fit_padding_px: DEFAULT_FIT_PADDING_PX,
        }
    }
}

/// A fully resolved camera move, as handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraCommand {
    pub center: Coordinate,
    pub zoom_level: f64,
    pub animation_duration_ms: u64,
    pub animation_mode: AnimationMode,
}

/// Per-side padding in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePadding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl EdgePadding {
    /// The same padding on all four sides. Negative values clamp to zero.
    pub fn uniform(px: f64) -> Self {
        let px = px.max(0.0);
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }

    /// True when all four sides are equal.
    pub fn is_uniform(&self) -> bool {
        self.top == self.right && self.right == self.bottom && self.bottom == self.left
    }
}

impl Default for EdgePadding {
    fn default() -> Self {
        Self::uniform(DEFAULT_FIT_PADDING_PX)
    }
}

/// A request to frame a bounding box.
///
/// The corners are not checked for inversion or degeneracy; callers validate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsRequest {
    pub northeast: Coordinate,
    pub southwest: Coordinate,
    pub padding: EdgePadding,
}

impl BoundsRequest {
    /// Build a bounds request. `None` padding means the default on every side.
    pub fn new(northeast: Coordinate, southwest: Coordinate, padding_px: Option<f64>) -> Self {
        let padding = padding_px.map(EdgePadding::uniform).unwrap_or_default();
        Self {
            northeast,
            southwest,
            padding,
        }
    }
}

/// Camera position as reported by a live view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub center: Coordinate,
    pub zoom_level: f64,
    /// Duration of the animation that produced this position.
    pub animation_duration_ms: u64,
    pub animation_mode: AnimationMode,
    /// Padding of the last fit-bounds, if that is how the camera got here.
    pub padding: Option<EdgePadding>,
}

impl CameraState {
    /// Initial position of a freshly constructed view.
    pub fn initial(center: Coordinate, zoom_level: f64) -> Self {
        Self {
            center,
            zoom_level,
            animation_duration_ms: 0,
            animation_mode: AnimationMode::Instant,
            padding: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bengaluru() -> Coordinate {
        Coordinate::new(77.5946, 12.9716).unwrap()
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let cmd = CameraRequest::centered(bengaluru()).resolve(&CameraDefaults::default());
        assert_eq!(cmd.zoom_level, 15.0);
        assert_eq!(cmd.animation_duration_ms, 500);
        assert_eq!(cmd.animation_mode, AnimationMode::Fly);
    }

    #[test]
    fn test_resolve_keeps_explicit_values() {
        let cmd = CameraRequest::centered(bengaluru())
            .with_zoom(12.0)
            .with_duration_ms(0)
            .with_mode(AnimationMode::Ease)
            .resolve(&CameraDefaults::default());
        assert_eq!(cmd.zoom_level, 12.0);
        assert_eq!(cmd.animation_duration_ms, 0);
        assert_eq!(cmd.animation_mode, AnimationMode::Ease);
    }

    #[test]
    fn test_negative_zoom_clamped() {
        let req = CameraRequest::centered(bengaluru()).with_zoom(-3.0);
        assert_eq!(req.zoom_level, Some(0.0));
    }

    #[test]
    fn test_bounds_default_padding_is_uniform_50() {
        let req = BoundsRequest::new(bengaluru(), bengaluru(), None);
        assert!(req.padding.is_uniform());
        assert_eq!(req.padding.top, 50.0);
        assert_eq!(req.padding.left, 50.0);
    }

    #[test]
    fn test_bounds_explicit_padding_overrides_all_sides() {
        let req = BoundsRequest::new(bengaluru(), bengaluru(), Some(20.0));
        assert_eq!(req.padding, EdgePadding::uniform(20.0));
        assert_eq!(req.padding.bottom, 20.0);
    }

    #[test]
    fn test_animation_mode_from_config_str() {
        assert_eq!(
            AnimationMode::from_config_str("flyTo"),
            Some(AnimationMode::Fly)
        );
        assert_eq!(
            AnimationMode::from_config_str("EASE"),
            Some(AnimationMode::Ease)
        );
        assert_eq!(
            AnimationMode::from_config_str("none"),
            Some(AnimationMode::Instant)
        );
        assert_eq!(AnimationMode::from_config_str("warp"), None);
    }
}
