//! In-memory map engine.
//!
//! Behaves like a real SDK binding from the controller's point of view:
//! configurable entry points, an availability check that can be delayed, a
//! view constructor that can fail or panic, and style-load signalling that
//! can be automatic or driven by the caller.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use super::{
    assess, BoxFuture, EngineCapabilities, EngineError, EngineEventSink, MapEngine, MapView,
    ViewSpec,
};
use crate::camera::{BoundsRequest, CameraCommand, CameraState};
use crate::coord::Coordinate;
use crate::overlay::Overlay;

/// What `create_view` does.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Construction {
    Succeed,
    Fail(String),
    Panic(String),
}

/// When the style-loaded signal is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StyleLoad {
    /// Caller sends it with [`SimulatedEngine::emit_style_loaded`].
    Manual,
    /// Sent from inside `create_view`.
    Immediate,
    /// Sent from a spawned task after the delay.
    After(Duration),
}

/// Builder for [`SimulatedEngine`].
#[derive(Debug, Clone)]
pub struct SimulatedEngineBuilder {
    name: String,
    capabilities: EngineCapabilities,
    platform_supported: bool,
    check_delay: Option<Duration>,
    construction: Construction,
    style_load: StyleLoad,
    overlay_failure: Option<String>,
}

impl SimulatedEngineBuilder {
    /// Override the reported entry points.
    pub fn capabilities(mut self, caps: EngineCapabilities) -> Self {
        self.capabilities = caps;
        self
    }

    /// Remove the view component, as when the native module failed to load.
    pub fn without_view(mut self) -> Self {
        self.capabilities.view = false;
        self
    }

    /// Report the current platform as unsupported.
    pub fn unsupported_platform(mut self) -> Self {
        self.platform_supported = false;
        self
    }

    /// Delay the availability check.
    pub fn check_delay(mut self, delay: Duration) -> Self {
        self.check_delay = Some(delay);
        self
    }

    /// Make `create_view` return an error.
    pub fn fail_construction(mut self, message: impl Into<String>) -> Self {
        self.construction = Construction::Fail(message.into());
        self
    }

    /// Make `create_view` panic.
    pub fn panic_on_construction(mut self, message: impl Into<String>) -> Self {
        self.construction = Construction::Panic(message.into());
        self
    }

    /// Signal style-loaded synchronously from `create_view`.
    pub fn style_loads_immediately(mut self) -> Self {
        self.style_load = StyleLoad::Immediate;
        self
    }

    /// Signal style-loaded from a task after `delay`.
    pub fn style_loads_after(mut self, delay: Duration) -> Self {
        self.style_load = StyleLoad::After(delay);
        self
    }

    /// Make overlay mounting fail with `message`.
    pub fn fail_overlays(mut self, message: impl Into<String>) -> Self {
        self.overlay_failure = Some(message.into());
        self
    }

    pub fn build(self) -> SimulatedEngine {
        SimulatedEngine {
            name: self.name,
            capabilities: self.capabilities,
            platform_supported: self.platform_supported,
            check_delay: self.check_delay,
            construction: self.construction,
            style_load: self.style_load,
            overlay_failure: self.overlay_failure,
            views_created: AtomicUsize::new(0),
            checks_started: AtomicUsize::new(0),
            events: Mutex::new(None),
        }
    }
}

/// Headless engine used by the CLI probe and the test suite.
pub struct SimulatedEngine {
    name: String,
    capabilities: EngineCapabilities,
    platform_supported: bool,
    check_delay: Option<Duration>,
    construction: Construction,
    style_load: StyleLoad,
    overlay_failure: Option<String>,
    views_created: AtomicUsize,
    checks_started: AtomicUsize,
    events: Mutex<Option<Arc<dyn EngineEventSink>>>,
}

impl std::fmt::Debug for SimulatedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedEngine")
            .field("name", &self.name)
            .field("capabilities", &self.capabilities)
            .field("platform_supported", &self.platform_supported)
            .field("views_created", &self.views_created())
            .finish_non_exhaustive()
    }
}

impl SimulatedEngine {
    /// Start building an engine with every entry point present.
    pub fn builder() -> SimulatedEngineBuilder {
        SimulatedEngineBuilder {
            name: "simulated".to_string(),
            capabilities: EngineCapabilities::full(),
            platform_supported: true,
            check_delay: None,
            construction: Construction::Succeed,
            style_load: StyleLoad::Manual,
            overlay_failure: None,
        }
    }

    /// Number of views constructed, including failed attempts.
    pub fn views_created(&self) -> usize {
        self.views_created.load(Ordering::SeqCst)
    }

    /// Number of availability checks started.
    pub fn checks_started(&self) -> usize {
        self.checks_started.load(Ordering::SeqCst)
    }

    /// Send style-loaded to the most recent view's listener.
    ///
    /// Returns `false` when no view has been constructed yet.
    pub fn emit_style_loaded(&self) -> bool {
        match self.events.lock().clone() {
            Some(events) => {
                events.style_loaded();
                true
            }
            None => false,
        }
    }

    /// Send a render failure to the most recent view's listener.
    pub fn emit_render_error(&self, message: impl Into<String>) -> bool {
        match self.events.lock().clone() {
            Some(events) => {
                events.render_error(message.into());
                true
            }
            None => false,
        }
    }
}

impl MapEngine for SimulatedEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> EngineCapabilities {
        self.capabilities
    }

    fn platform_supported(&self) -> bool {
        self.platform_supported
    }

    fn check_availability(&self) -> BoxFuture<'_, Result<(), String>> {
        self.checks_started.fetch_add(1, Ordering::SeqCst);
        let verdict = assess(self.platform_supported, &self.capabilities);
        let delay = self.check_delay;
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            verdict
        })
    }

    fn create_view(&self, spec: ViewSpec) -> Result<Box<dyn MapView>, EngineError> {
        self.views_created.fetch_add(1, Ordering::SeqCst);

        match &self.construction {
            Construction::Succeed => {}
            Construction::Fail(msg) => return Err(EngineError::Construction(msg.clone())),
            Construction::Panic(msg) => panic!("{}", msg),
        }

        let events = Arc::clone(&spec.events);
        *self.events.lock() = Some(Arc::clone(&events));

        debug!(
            engine = %self.name,
            center = %spec.center,
            zoom = spec.zoom_level,
            style = %spec.style_url,
            "Simulated view constructed"
        );

        let view = SimulatedView::new(spec.center, spec.zoom_level, self.overlay_failure.clone());

        match self.style_load {
            StyleLoad::Manual => {}
            StyleLoad::Immediate => events.style_loaded(),
            StyleLoad::After(delay) => {
                if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                    runtime.spawn(async move {
                        tokio::time::sleep(delay).await;
                        events.style_loaded();
                    });
                }
            }
        }

        Ok(Box::new(view))
    }
}

/// View produced by [`SimulatedEngine`]. Records what it was asked to do.
#[derive(Debug, Clone)]
pub struct SimulatedView {
    camera: CameraState,
    overlays: Vec<Overlay>,
    overlay_failure: Option<String>,
}

impl SimulatedView {
    fn new(center: Coordinate, zoom_level: f64, overlay_failure: Option<String>) -> Self {
        Self {
            camera: CameraState::initial(center, zoom_level),
            overlays: Vec::new(),
            overlay_failure,
        }
    }

    /// Overlays currently mounted.
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }
}

impl MapView for SimulatedView {
    fn set_camera(&mut self, command: &CameraCommand) -> Result<(), EngineError> {
        self.camera = CameraState {
            center: command.center,
            zoom_level: command.zoom_level,
            animation_duration_ms: command.animation_duration_ms,
            animation_mode: command.animation_mode,
            padding: None,
        };
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: &BoundsRequest, duration_ms: u64) -> Result<(), EngineError> {
        let ne = bounds.northeast;
        let sw = bounds.southwest;
        // Centre of the box; the simulated view has no viewport size so zoom
        // is left where it was.
        let center = Coordinate::new((ne.lng() + sw.lng()) / 2.0, (ne.lat() + sw.lat()) / 2.0)
            .map_err(|e| EngineError::Command(e.to_string()))?;
        self.camera = CameraState {
            center,
            zoom_level: self.camera.zoom_level,
            animation_duration_ms: duration_ms,
            animation_mode: self.camera.animation_mode,
            padding: Some(bounds.padding),
        };
        Ok(())
    }

    fn mount_overlays(&mut self, overlays: &[Overlay]) -> Result<(), EngineError> {
        if let Some(msg) = &self.overlay_failure {
            return Err(EngineError::Render(msg.clone()));
        }
        self.overlays = overlays.to_vec();
        Ok(())
    }

    fn camera(&self) -> CameraState {
        self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraDefaults, CameraRequest};

    struct NoopEvents;

    impl EngineEventSink for NoopEvents {
        fn style_loaded(&self) {}
        fn render_error(&self, _message: String) {}
    }

    fn spec() -> ViewSpec {
        ViewSpec {
            center: Coordinate::new(72.8777, 19.0760).unwrap(),
            zoom_level: 14.0,
            style_url: "mapbox://styles/mapbox/streets-v12".to_string(),
            compass: true,
            attribution: false,
            logo: false,
            events: Arc::new(NoopEvents),
        }
    }

    #[tokio::test]
    async fn test_check_reports_missing_view() {
        let engine = SimulatedEngine::builder().without_view().build();
        let verdict = engine.check_availability().await;
        assert!(verdict.is_err());
        assert_eq!(engine.checks_started(), 1);
    }

    #[test]
    fn test_failed_construction_counts_attempt() {
        let engine = SimulatedEngine::builder()
            .fail_construction("style missing")
            .build();
        let result = engine.create_view(spec());
        assert!(matches!(result, Err(EngineError::Construction(_))));
        assert_eq!(engine.views_created(), 1);
    }

    #[test]
    fn test_view_records_camera() {
        let engine = SimulatedEngine::builder().build();
        let mut view = engine.create_view(spec()).unwrap();
        assert_eq!(view.camera().zoom_level, 14.0);

        let target = Coordinate::new(77.5946, 12.9716).unwrap();
        let cmd = CameraRequest::centered(target)
            .with_zoom(12.0)
            .resolve(&CameraDefaults::default());
        view.set_camera(&cmd).unwrap();

        assert_eq!(view.camera().center, target);
        assert_eq!(view.camera().animation_duration_ms, 500);
    }

    #[test]
    fn test_emit_without_view_is_noop() {
        let engine = SimulatedEngine::builder().build();
        assert!(!engine.emit_style_loaded());
    }
}
