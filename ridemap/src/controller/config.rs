//! Per-mount controller configuration.

use crate::camera::CameraDefaults;

/// Style loaded when the host does not choose one.
pub const DEFAULT_STYLE_URL: &str = "mapbox://styles/mapbox/streets-v12";

/// Zoom of the initial camera.
pub const DEFAULT_MAP_ZOOM: f64 = 14.0;

/// Optional settings for a mounted map.
///
/// Defaults: zoom 14, compass on, attribution off, logo off, default style.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Zoom of the initial camera.
    pub zoom_level: f64,
    /// Style URL handed to the engine.
    pub style_url: String,
    /// Show the compass control.
    pub compass: bool,
    /// Show the attribution control.
    pub attribution: bool,
    /// Show the engine logo.
    pub logo: bool,
    /// Defaults for handle commands that omit fields.
    pub camera: CameraDefaults,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom_level: DEFAULT_MAP_ZOOM,
            style_url: DEFAULT_STYLE_URL.to_string(),
            compass: true,
            attribution: false,
            logo: false,
            camera: CameraDefaults::default(),
        }
    }
}

impl MapConfig {
    /// Set the initial zoom. Negative values clamp to zero.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom_level = zoom.max(0.0);
        self
    }

    /// Set the style URL.
    pub fn with_style_url(mut self, url: impl Into<String>) -> Self {
        self.style_url = url.into();
        self
    }

    /// Toggle the compass.
    pub fn with_compass(mut self, enabled: bool) -> Self {
        self.compass = enabled;
        self
    }

    /// Toggle attribution.
    pub fn with_attribution(mut self, enabled: bool) -> Self {
        self.attribution = enabled;
        self
    }

    /// Toggle the logo.
    pub fn with_logo(mut self, enabled: bool) -> Self {
        self.logo = enabled;
        self
    }

    /// Replace the camera command defaults.
    pub fn with_camera_defaults(mut self, camera: CameraDefaults) -> Self {
        self.camera = camera;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MapConfig::default();
        assert_eq!(config.zoom_level, 14.0);
        assert!(config.compass);
        assert!(!config.attribution);
        assert!(!config.logo);
        assert_eq!(config.style_url, DEFAULT_STYLE_URL);
        assert_eq!(config.camera.zoom_level, 15.0);
    }

    #[test]
    fn test_builder_overrides() {
        let config = MapConfig::default()
            .with_zoom(-1.0)
            .with_style_url("https://demotiles.maplibre.org/style.json")
            .with_logo(true);
        assert_eq!(config.zoom_level, 0.0);
        assert!(config.logo);
        assert!(config.style_url.contains("maplibre"));
    }
}
