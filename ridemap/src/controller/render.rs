//! Views produced by [`MapController::render`](super::MapController::render).

use crate::camera::CameraState;
use crate::coord::Coordinate;
use crate::overlay::Overlay;

/// Text shown while the engine loads.
pub const LOADING_MESSAGE: &str = "Loading map...";

/// Note shown in the fallback in place of overlays.
pub const OVERLAY_NOTE: &str = "Markers and routes will appear once the map is available.";

/// Reason shown when the live view itself failed.
pub const RENDER_FAILED_REASON: &str = "Map failed to render";

/// Reason shown when rendering a mount that has been torn down.
pub const UNMOUNTED_REASON: &str = "Map has been unmounted";

/// The one view a controller shows at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedView {
    /// Spinner while the engine loads.
    Loading { message: &'static str },
    /// Degraded view when the map cannot be shown.
    Fallback(FallbackView),
    /// The engine's view with overlays mounted.
    LiveMap(LiveMapView),
}

impl RenderedView {
    pub fn is_loading(&self) -> bool {
        matches!(self, RenderedView::Loading { .. })
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RenderedView::Fallback(_))
    }

    pub fn is_live(&self) -> bool {
        matches!(self, RenderedView::LiveMap(_))
    }

    pub fn as_fallback(&self) -> Option<&FallbackView> {
        match self {
            RenderedView::Fallback(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_live(&self) -> Option<&LiveMapView> {
        match self {
            RenderedView::LiveMap(l) => Some(l),
            _ => None,
        }
    }

    pub(crate) fn loading() -> Self {
        RenderedView::Loading {
            message: LOADING_MESSAGE,
        }
    }
}

/// Contents of the fallback view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackView {
    /// Why the map is not shown.
    pub reason: String,
    /// `"Location: lat, lng"` of the initial coordinate, four decimals.
    pub location: String,
    /// Explains that overlays are withheld.
    pub overlay_note: &'static str,
    /// Error detail when the live view failed.
    pub detail: Option<String>,
}

impl FallbackView {
    pub(crate) fn new(reason: impl Into<String>, initial: Coordinate, detail: Option<String>) -> Self {
        Self {
            reason: reason.into(),
            location: format!("Location: {}", initial.display_lat_lng()),
            overlay_note: OVERLAY_NOTE,
            detail,
        }
    }
}

/// Contents of the live map view.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveMapView {
    pub style_url: String,
    pub camera: CameraState,
    /// Overlays handed to the engine.
    pub overlays: Vec<Overlay>,
    /// Labels of overlays skipped because the engine lacks their primitive.
    pub skipped_overlays: Vec<String>,
    pub compass: bool,
    pub attribution: bool,
    pub logo: bool,
}
