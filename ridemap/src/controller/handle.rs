//! Imperative camera control for a mounted controller.

use std::sync::Arc;

use super::shared::Shared;
use crate::camera::{BoundsRequest, CameraRequest, CameraState};
use crate::coord::Coordinate;

/// Camera control surface returned from a mount.
///
/// Commands are fire-and-forget. When the live view is not ready they are
/// dropped and the drop is written to the controller's diagnostic sink.
/// Engine errors and panics inside a command are logged there too.
#[derive(Clone)]
pub struct MapHandle {
    pub(crate) shared: Arc<Shared>,
}

impl MapHandle {
    /// Move the camera. Omitted zoom and duration use the configured defaults.
    pub fn set_camera(&self, request: CameraRequest) {
        self.shared.set_camera(request);
    }

    /// Frame the box between `northeast` and `southwest`.
    ///
    /// `padding_px` applies to all four sides; `None` means 50 px.
    pub fn fit_bounds(&self, northeast: Coordinate, southwest: Coordinate, padding_px: Option<f64>) {
        self.shared
            .fit_bounds(BoundsRequest::new(northeast, southwest, padding_px));
    }

    /// Camera position of the live view, if there is one.
    pub fn camera(&self) -> Option<CameraState> {
        self.shared.camera()
    }

    /// Identifier of the mount this handle controls.
    pub fn mount_id(&self) -> u64 {
        self.shared.mount_id
    }
}

impl std::fmt::Debug for MapHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapHandle")
            .field("mount_id", &self.shared.mount_id)
            .finish()
    }
}
