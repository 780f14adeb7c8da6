//! Map availability controller.
//!
//! Decides whether a map engine can be used, shows one of three views
//! (loading, fallback, live map) and exposes a [`MapHandle`] for camera
//! control. Engine failures never escape: they become state transitions and
//! are reported through the optional callbacks.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        MapController                          │
//! │                                                               │
//! │  mount ──► check task ──► Checking ─┬─► Available ──► view    │
//! │   │        (tokio, cancellable)     └─► Unavailable           │
//! │   │                                                           │
//! │   └──► MapHandle (set_camera / fit_bounds) ─► live view       │
//! │                                                               │
//! │  engine events: style_loaded ─► on_map_ready                  │
//! │                 render_error ─► RenderFailed ─► on_error      │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ridemap::controller::{MapCallbacks, MapConfig, MapController};
//! use ridemap::engine::SimulatedEngine;
//!
//! let engine = Arc::new(SimulatedEngine::builder().build());
//! let (controller, handle) = MapController::builder(engine, mumbai)
//!     .config(MapConfig::default())
//!     .callbacks(MapCallbacks::new().on_map_ready(|| println!("ready")))
//!     .mount_on(&tokio::runtime::Handle::current());
//!
//! handle.set_camera(CameraRequest::centered(bengaluru).with_zoom(12.0));
//! let view = controller.render(&overlays);
//! ```

mod callbacks;
mod config;
mod error;
mod handle;
mod render;
mod shared;
mod state;

pub use callbacks::MapCallbacks;
pub use config::{MapConfig, DEFAULT_MAP_ZOOM, DEFAULT_STYLE_URL};
pub use error::MapError;
pub use handle::MapHandle;
pub use render::{
    FallbackView, LiveMapView, RenderedView, LOADING_MESSAGE, OVERLAY_NOTE, RENDER_FAILED_REASON,
    UNMOUNTED_REASON,
};
pub use state::AvailabilityState;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;

use crate::coord::Coordinate;
use crate::diagnostics::{DiagnosticSink, Severity, TracingSink};
use crate::engine::MapEngine;
use crate::overlay::Overlay;
use shared::Shared;

static NEXT_MOUNT_ID: AtomicU64 = AtomicU64::new(1);

/// Builder collecting the optional parts of a mount.
pub struct MapControllerBuilder {
    engine: Arc<dyn MapEngine>,
    initial: Coordinate,
    config: MapConfig,
    callbacks: MapCallbacks,
    sink: Arc<dyn DiagnosticSink>,
}

impl MapControllerBuilder {
    /// Map settings; defaults when not called.
    pub fn config(mut self, config: MapConfig) -> Self {
        self.config = config;
        self
    }

    /// Host callbacks; none when not called.
    pub fn callbacks(mut self, callbacks: MapCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Diagnostic sink; [`TracingSink`] when not called.
    pub fn sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Mount and spawn the availability check on `runtime`.
    pub fn mount_on(self, runtime: &Handle) -> (MapController, MapHandle) {
        let shared = self.into_shared();
        shared.log(
            Severity::Debug,
            &format!(
                "Mounting map at {} with engine '{}'",
                shared.initial,
                shared.engine.name()
            ),
        );
        runtime.spawn(Arc::clone(&shared).run_check());
        Self::finish(shared)
    }

    /// Mount on the ambient Tokio runtime.
    ///
    /// Without a runtime the check cannot run, so the mount resolves straight
    /// to `Unavailable`.
    pub fn mount(self) -> (MapController, MapHandle) {
        match Handle::try_current() {
            Ok(runtime) => self.mount_on(&runtime),
            Err(_) => {
                let shared = self.into_shared();
                shared.resolve_check(Err(
                    "No async runtime available for the map availability check".to_string(),
                ));
                Self::finish(shared)
            }
        }
    }

    fn into_shared(self) -> Arc<Shared> {
        let mount_id = NEXT_MOUNT_ID.fetch_add(1, Ordering::Relaxed);
        Arc::new(Shared::new(
            mount_id,
            self.engine,
            self.initial,
            self.config,
            self.callbacks,
            self.sink,
        ))
    }

    fn finish(shared: Arc<Shared>) -> (MapController, MapHandle) {
        let handle = MapHandle {
            shared: Arc::clone(&shared),
        };
        (MapController { shared }, handle)
    }
}

/// One mounted map.
///
/// Dropping the controller unmounts it.
pub struct MapController {
    shared: Arc<Shared>,
}

impl MapController {
    /// Start configuring a mount of `engine` centred on `initial`.
    pub fn builder(engine: Arc<dyn MapEngine>, initial: Coordinate) -> MapControllerBuilder {
        MapControllerBuilder {
            engine,
            initial,
            config: MapConfig::default(),
            callbacks: MapCallbacks::default(),
            sink: Arc::new(TracingSink),
        }
    }

    /// Identifier of this mount, as passed to the diagnostic sink.
    pub fn mount_id(&self) -> u64 {
        self.shared.mount_id
    }

    /// Current availability state.
    pub fn state(&self) -> AvailabilityState {
        self.shared.inner.lock().state.clone()
    }

    /// Whether the loading view is showing.
    pub fn is_loading(&self) -> bool {
        self.shared.inner.lock().is_loading
    }

    /// Whether `unmount` has not been called.
    pub fn is_mounted(&self) -> bool {
        self.shared.is_mounted()
    }

    /// Initial camera center.
    pub fn initial_coordinate(&self) -> Coordinate {
        self.shared.initial
    }

    /// Another handle to this mount.
    pub fn handle(&self) -> MapHandle {
        MapHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Engine load-complete signal for hosts that wire engine events manually.
    pub fn style_loaded(&self) {
        self.shared.style_loaded();
    }

    /// Produce the view to show, mounting `overlays` only on the live map.
    ///
    /// Engine errors and panics while mounting overlays end in the fallback
    /// and never reach the caller. After [`unmount`](Self::unmount) this
    /// returns a fallback with [`UNMOUNTED_REASON`].
    pub fn render(&self, overlays: &[Overlay]) -> RenderedView {
        self.shared.render(overlays)
    }

    /// Tear down the mount. No callback fires once this returns.
    pub fn unmount(&self) {
        self.shared.unmount();
    }
}

impl Drop for MapController {
    fn drop(&mut self) {
        self.shared.unmount();
    }
}

impl std::fmt::Debug for MapController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapController")
            .field("mount_id", &self.shared.mount_id)
            .field("state", &self.state())
            .field("is_loading", &self.is_loading())
            .finish()
    }
}
