//! State shared between a controller, its handles and its check task.
//!
//! Locking rules:
//! - `inner` guards the state machine. No engine view method, host callback or
//!   diagnostic sink call happens while it is held. A view call takes the view
//!   out of `inner`, runs unlocked under a panic guard and puts it back, so an
//!   engine may raise events from inside any view method.
//! - `gate` is held while callbacks fire. `unmount` cancels the mount token and
//!   then takes the gate, so once `unmount` returns no callback is running or
//!   will run. The gate is reentrant so a callback may unmount its own map.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use futures::FutureExt;
use parking_lot::{Mutex, ReentrantMutex};
use tokio_util::sync::CancellationToken;

use super::callbacks::{MapCallbacks, Notice};
use super::config::MapConfig;
use super::error::MapError;
use super::render::{
    FallbackView, LiveMapView, RenderedView, RENDER_FAILED_REASON, UNMOUNTED_REASON,
};
use super::state::AvailabilityState;
use crate::camera::{BoundsRequest, CameraRequest, CameraState};
use crate::coord::Coordinate;
use crate::diagnostics::{DiagnosticSink, Severity};
use crate::engine::{EngineError, EngineEventSink, MapEngine, MapView, ViewSpec};
use crate::overlay::Overlay;

/// Mutable part of a mount.
pub(crate) struct Inner {
    pub(crate) state: AvailabilityState,
    pub(crate) is_loading: bool,
    view: Option<Box<dyn MapView>>,
    error_reported: bool,
    ready_fired: bool,
    /// Style-loaded arrived while the view was out of `view`.
    style_pending: bool,
    /// The view is out of `view` for an engine call.
    view_busy: bool,
}

impl Inner {
    fn new() -> Self {
        Self {
            state: AvailabilityState::Checking,
            is_loading: true,
            view: None,
            error_reported: false,
            ready_fired: false,
            style_pending: false,
            view_busy: false,
        }
    }

    /// Leave the loading state; `Ready` the first time only.
    fn mark_ready(&mut self) -> Option<Notice> {
        self.is_loading = false;
        self.style_pending = false;
        if self.ready_fired {
            return None;
        }
        self.ready_fired = true;
        Some(Notice::Ready)
    }

    /// Produce an error notice unless one was already produced this mount.
    fn error_notice(&mut self, err: MapError) -> Option<Notice> {
        if self.error_reported {
            return None;
        }
        self.error_reported = true;
        Some(Notice::Error(err))
    }

    /// Move to `RenderFailed` if currently available. The released view is
    /// returned so it can be dropped outside the lock.
    fn render_failed(&mut self, reason: &str) -> (Option<Notice>, Option<Box<dyn MapView>>) {
        if !self.state.is_available() {
            return (None, None);
        }
        self.state = AvailabilityState::RenderFailed(reason.to_string());
        self.is_loading = false;
        let released = self.view.take();
        (
            self.error_notice(MapError::ConstructionFailure(reason.to_string())),
            released,
        )
    }
}

pub(crate) struct Shared {
    pub(crate) mount_id: u64,
    pub(crate) initial: Coordinate,
    pub(crate) config: MapConfig,
    pub(crate) engine: Arc<dyn MapEngine>,
    sink: Arc<dyn DiagnosticSink>,
    callbacks: MapCallbacks,
    pub(crate) token: CancellationToken,
    gate: ReentrantMutex<()>,
    pub(crate) inner: Mutex<Inner>,
}

impl Shared {
    pub(crate) fn new(
        mount_id: u64,
        engine: Arc<dyn MapEngine>,
        initial: Coordinate,
        config: MapConfig,
        callbacks: MapCallbacks,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            mount_id,
            initial,
            config,
            engine,
            sink,
            callbacks,
            token: CancellationToken::new(),
            gate: ReentrantMutex::new(()),
            inner: Mutex::new(Inner::new()),
        }
    }

    pub(crate) fn log(&self, severity: Severity, message: &str) {
        self.sink.record(severity, self.mount_id, message);
    }

    pub(crate) fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Fire notices unless the mount has been torn down.
    fn notify(&self, notices: impl IntoIterator<Item = Notice>) {
        let _gate = self.gate.lock();
        for notice in notices {
            // Re-checked per notice: a callback may have unmounted us.
            if self.token.is_cancelled() {
                return;
            }
            self.callbacks.fire(&notice);
        }
    }

    /// Body of the availability check task.
    pub(crate) async fn run_check(self: Arc<Self>) {
        let engine = Arc::clone(&self.engine);
        let token = self.token.clone();

        let check = match panic::catch_unwind(AssertUnwindSafe(|| engine.check_availability())) {
            Ok(check) => check,
            Err(payload) => {
                self.resolve_check(Err(panic_message(payload.as_ref())));
                return;
            }
        };

        let verdict = tokio::select! {
            biased;

            _ = token.cancelled() => {
                self.log(Severity::Debug, "Availability check abandoned: controller unmounted");
                return;
            }

            outcome = AssertUnwindSafe(check).catch_unwind() => match outcome {
                Ok(verdict) => verdict,
                Err(payload) => Err(panic_message(payload.as_ref())),
            },
        };

        self.resolve_check(verdict);
    }

    /// Apply the outcome of the availability check.
    pub(crate) fn resolve_check(self: &Arc<Self>, verdict: Result<(), String>) {
        let notices = {
            let mut inner = self.inner.lock();
            if self.token.is_cancelled() || inner.state != AvailabilityState::Checking {
                return;
            }
            match &verdict {
                Ok(()) => {
                    inner.state = AvailabilityState::Available;
                    vec![Notice::Availability(true)]
                }
                Err(reason) => {
                    inner.state = AvailabilityState::Unavailable(reason.clone());
                    inner.is_loading = false;
                    let mut notices = vec![Notice::Availability(false)];
                    notices.extend(
                        inner.error_notice(MapError::EngineUnavailable(reason.clone())),
                    );
                    notices
                }
            }
        };

        match &verdict {
            Ok(()) => self.log(
                Severity::Info,
                &format!("Map engine '{}' available", self.engine.name()),
            ),
            Err(reason) => self.log(
                Severity::Warn,
                &format!("Map engine '{}' unavailable: {}", self.engine.name(), reason),
            ),
        }

        self.notify(notices);

        if verdict.is_ok() {
            self.construct_view();
        }
    }

    /// Build the live view so the engine can start loading its style.
    fn construct_view(self: &Arc<Self>) {
        if self.token.is_cancelled() {
            return;
        }

        let events: Arc<dyn EngineEventSink> = Arc::new(ControllerEvents {
            shared: Arc::downgrade(self),
        });
        let spec = ViewSpec {
            center: self.initial,
            zoom_level: self.config.zoom_level,
            style_url: self.config.style_url.clone(),
            compass: self.config.compass,
            attribution: self.config.attribution,
            logo: self.config.logo,
            events,
        };

        let engine = Arc::clone(&self.engine);
        let result = match panic::catch_unwind(AssertUnwindSafe(|| engine.create_view(spec))) {
            Ok(Ok(view)) => Ok(view),
            Ok(Err(e)) => Err(e.to_string()),
            Err(payload) => Err(panic_message(payload.as_ref())),
        };

        match result {
            Ok(view) => {
                let notice = {
                    let mut inner = self.inner.lock();
                    if self.token.is_cancelled() || !inner.state.is_available() {
                        return;
                    }
                    inner.view = Some(view);
                    if inner.style_pending {
                        inner.mark_ready()
                    } else {
                        None
                    }
                };
                self.log(Severity::Debug, "Live map view constructed");
                if notice.is_some() {
                    self.log(Severity::Info, "Map style loaded");
                }
                self.notify(notice);
            }
            Err(reason) => self.fail_render(&reason),
        }
    }

    /// The live view failed; substitute the fallback for the rest of the mount.
    pub(crate) fn fail_render(&self, reason: &str) {
        let (notice, released) = {
            let mut inner = self.inner.lock();
            if self.token.is_cancelled() || !inner.state.is_available() {
                return;
            }
            inner.render_failed(reason)
        };
        drop(released);
        self.log(Severity::Error, &format!("Map render failed: {}", reason));
        self.notify(notice);
    }

    /// The engine finished loading its style.
    ///
    /// Ignored unless available. A signal sent from inside the view
    /// constructor or another view call is held until the view is back.
    pub(crate) fn style_loaded(&self) {
        let notice = {
            let mut inner = self.inner.lock();
            if self.token.is_cancelled() || !inner.state.is_available() {
                return;
            }
            if inner.view.is_none() {
                inner.style_pending = true;
                return;
            }
            inner.mark_ready()
        };
        if notice.is_some() {
            self.log(Severity::Info, "Map style loaded");
        }
        self.notify(notice);
    }

    /// What to show when the live map is not in play, or `None` when it is.
    fn settled_view(&self) -> Option<RenderedView> {
        if self.token.is_cancelled() {
            return Some(RenderedView::Fallback(FallbackView::new(
                UNMOUNTED_REASON,
                self.initial,
                None,
            )));
        }

        let inner = self.inner.lock();
        if inner.is_loading {
            return Some(RenderedView::loading());
        }
        match &inner.state {
            AvailabilityState::Available if inner.view_busy => Some(RenderedView::loading()),
            AvailabilityState::Available => None,
            AvailabilityState::RenderFailed(reason) => Some(RenderedView::Fallback(
                FallbackView::new(RENDER_FAILED_REASON, self.initial, Some(reason.clone())),
            )),
            other => {
                let reason = other.reason().unwrap_or("Map is not available").to_string();
                Some(RenderedView::Fallback(FallbackView::new(
                    reason,
                    self.initial,
                    None,
                )))
            }
        }
    }

    /// Apply the rendering policy.
    pub(crate) fn render(&self, overlays: &[Overlay]) -> RenderedView {
        if let Some(view) = self.settled_view() {
            return view;
        }

        let caps = self.engine.capabilities();
        let (mounted, skipped): (Vec<&Overlay>, Vec<&Overlay>) = overlays
            .iter()
            .partition(|o| caps.supports(o.primitive()));
        let mounted: Vec<Overlay> = mounted.into_iter().cloned().collect();
        let skipped: Vec<String> = skipped.iter().map(|o| o.label().to_string()).collect();

        let outcome = self.with_view("render", |view| {
            view.mount_overlays(&mounted)?;
            Ok(view.camera())
        });

        let camera = match outcome {
            Ok(Ok(camera)) => camera,
            Ok(Err(reason)) => {
                self.fail_render(&reason);
                return self.settled_view().unwrap_or_else(|| {
                    RenderedView::Fallback(FallbackView::new(
                        RENDER_FAILED_REASON,
                        self.initial,
                        Some(reason),
                    ))
                });
            }
            // Unmounted or failed while the overlays were being prepared.
            Err(_) => return self.settled_view().unwrap_or_else(RenderedView::loading),
        };

        // The engine may have reported a failure from inside the call.
        if let Some(view) = self.settled_view() {
            return view;
        }

        if !skipped.is_empty() {
            self.log(
                Severity::Warn,
                &format!("Engine lacks primitives for overlays: {}", skipped.join(", ")),
            );
        }

        RenderedView::LiveMap(LiveMapView {
            style_url: self.config.style_url.clone(),
            camera,
            overlays: mounted,
            skipped_overlays: skipped,
            compass: self.config.compass,
            attribution: self.config.attribution,
            logo: self.config.logo,
        })
    }

    pub(crate) fn set_camera(&self, request: CameraRequest) {
        let command = request.resolve(&self.config.camera);
        match self.with_view("setCamera", |view| view.set_camera(&command)) {
            Err(suppressed) => self.log(Severity::Warn, &suppressed.to_string()),
            Ok(Ok(())) => self.log(
                Severity::Debug,
                &format!(
                    "Camera moved to {} at zoom {} ({}ms)",
                    command.center, command.zoom_level, command.animation_duration_ms
                ),
            ),
            Ok(Err(e)) => self.log(Severity::Warn, &format!("setCamera failed: {}", e)),
        }
    }

    pub(crate) fn fit_bounds(&self, bounds: BoundsRequest) {
        let duration = self.config.camera.animation_duration_ms;
        match self.with_view("fitBounds", |view| view.fit_bounds(&bounds, duration)) {
            Err(suppressed) => self.log(Severity::Warn, &suppressed.to_string()),
            Ok(Ok(())) => self.log(
                Severity::Debug,
                &format!(
                    "Camera framed {} / {} with {}px padding",
                    bounds.northeast, bounds.southwest, bounds.padding.top
                ),
            ),
            Ok(Err(e)) => self.log(Severity::Warn, &format!("fitBounds failed: {}", e)),
        }
    }

    pub(crate) fn camera(&self) -> Option<CameraState> {
        match self.with_view("camera", |view| Ok(view.camera())) {
            Ok(Ok(camera)) => Some(camera),
            _ => None,
        }
    }

    /// Run `call` on the live view with no lock held.
    ///
    /// The outer error means the call was not made; the inner one carries an
    /// engine error or panic message.
    fn with_view<T>(
        &self,
        command: &'static str,
        call: impl FnOnce(&mut dyn MapView) -> Result<T, EngineError>,
    ) -> Result<Result<T, String>, MapError> {
        let mut view = {
            let mut inner = self.inner.lock();
            self.take_view(&mut inner, command)?
        };

        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| call(view.as_mut()))) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(e.to_string()),
            Err(payload) => Err(panic_message(payload.as_ref())),
        };

        let (notice, released) = {
            let mut inner = self.inner.lock();
            inner.view_busy = false;
            if self.token.is_cancelled() || !inner.state.is_available() {
                (None, Some(view))
            } else {
                inner.view = Some(view);
                let notice = if inner.style_pending {
                    inner.mark_ready()
                } else {
                    None
                };
                (notice, None)
            }
        };
        drop(released);
        if notice.is_some() {
            self.log(Severity::Info, "Map style loaded");
        }
        self.notify(notice);

        Ok(outcome)
    }

    /// Move the live view out of `inner`, or say why a command must be dropped.
    fn take_view(
        &self,
        inner: &mut Inner,
        command: &'static str,
    ) -> Result<Box<dyn MapView>, MapError> {
        let suppressed = |reason: &str| MapError::CommandSuppressed {
            command,
            reason: reason.to_string(),
        };

        if self.token.is_cancelled() {
            return Err(suppressed("controller unmounted"));
        }
        if !inner.state.is_available() {
            return Err(suppressed(&format!(
                "map is {}",
                inner.state.display_status()
            )));
        }
        if inner.view_busy {
            return Err(suppressed("engine busy with another call"));
        }
        let view = inner.view.take().ok_or_else(|| suppressed("engine not ready"))?;
        inner.view_busy = true;
        Ok(view)
    }

    /// Tear down the mount. Idempotent.
    pub(crate) fn unmount(&self) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        // Wait out any callback currently firing on another thread.
        drop(self.gate.lock());
        let released = self.inner.lock().view.take();
        drop(released);
        self.log(Severity::Debug, "Map controller unmounted");
    }
}

/// Engine-facing listener; holds the mount weakly.
struct ControllerEvents {
    shared: Weak<Shared>,
}

impl EngineEventSink for ControllerEvents {
    fn style_loaded(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.style_loaded();
        }
    }

    fn render_error(&self, message: String) {
        if let Some(shared) = self.shared.upgrade() {
            shared.fail_render(&message);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "map engine panicked".to_string()
    }
}
