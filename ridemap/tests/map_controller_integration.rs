//! Integration tests for the map availability controller.
//!
//! These tests drive a full mount through the public API:
//! - Availability check → live map → camera commands
//! - Missing engine entry points → fallback view
//! - Unmount racing the availability check
//! - Ride overlays and bounds from the mock ride API
//!
//! Run with: `cargo test --test map_controller_integration`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use ridemap::camera::{AnimationMode, CameraRequest};
use ridemap::controller::{
    AvailabilityState, MapCallbacks, MapConfig, MapController, MapError, RenderedView,
    OVERLAY_NOTE,
};
use ridemap::coord::Coordinate;
use ridemap::diagnostics::{DiagnosticSink, RecordingSink, Severity};
use ridemap::engine::{MapEngine, SimulatedEngine};
use ridemap::overlay::Overlay;
use ridemap::rides::{ride_bounds, ride_overlays, MockRideApi, RideApi};

// ============================================================================
// Helper Functions
// ============================================================================

fn mumbai() -> Coordinate {
    Coordinate::new(72.8777, 19.0760).unwrap()
}

fn bengaluru() -> Coordinate {
    Coordinate::new(77.5946, 12.9716).unwrap()
}

/// Everything the host callbacks saw.
#[derive(Default)]
struct HostLog {
    ready: AtomicUsize,
    availability: Mutex<Vec<bool>>,
    errors: Mutex<Vec<MapError>>,
}

impl HostLog {
    fn callbacks(self: &Arc<Self>) -> MapCallbacks {
        let (a, b, c) = (Arc::clone(self), Arc::clone(self), Arc::clone(self));
        MapCallbacks::new()
            .on_map_ready(move || {
                a.ready.fetch_add(1, Ordering::SeqCst);
            })
            .on_availability_change(move |available| b.availability.lock().push(available))
            .on_error(move |e| c.errors.lock().push(e.clone()))
    }
}

fn mount(
    engine: Arc<SimulatedEngine>,
    log: &Arc<HostLog>,
    sink: &Arc<RecordingSink>,
) -> (MapController, ridemap::MapHandle) {
    MapController::builder(engine as Arc<dyn MapEngine>, mumbai())
        .config(MapConfig::default())
        .callbacks(log.callbacks())
        .sink(Arc::clone(sink) as Arc<dyn DiagnosticSink>)
        .mount()
}

/// Poll until `done` holds, failing after two seconds.
async fn wait_until(mut done: impl FnMut() -> bool) {
    for _ in 0..200 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

// ============================================================================
// End-to-end Scenarios
// ============================================================================

/// Mount in Mumbai, wait for the live map, then move to Bengaluru.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_live_map_moves_to_bengaluru() {
    let engine = Arc::new(
        SimulatedEngine::builder()
            .style_loads_after(Duration::from_millis(30))
            .build(),
    );
    let log = Arc::new(HostLog::default());
    let sink = Arc::new(RecordingSink::new());
    let (controller, handle) = mount(Arc::clone(&engine), &log, &sink);

    wait_until(|| log.ready.load(Ordering::SeqCst) == 1).await;
    assert_eq!(controller.state(), AvailabilityState::Available);
    assert_eq!(*log.availability.lock(), vec![true]);

    let view = controller.render(&[]);
    let live = view.as_live().expect("live map after ready");
    assert_eq!(live.camera.center, mumbai());
    assert_eq!(live.camera.zoom_level, 14.0);

    handle.set_camera(CameraRequest::centered(bengaluru()).with_zoom(12.0));

    let camera = handle.camera().expect("camera after ready");
    assert_eq!(camera.center, bengaluru());
    assert_eq!(camera.zoom_level, 12.0);
    assert_eq!(camera.animation_duration_ms, 500);
    assert_eq!(camera.animation_mode, AnimationMode::Fly);

    assert!(log.errors.lock().is_empty());
    assert!(sink.at_least(Severity::Warn).is_empty());
}

/// A missing view component leaves a text fallback with the location.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_missing_view_component_shows_location() {
    let engine = Arc::new(SimulatedEngine::builder().without_view().build());
    let log = Arc::new(HostLog::default());
    let sink = Arc::new(RecordingSink::new());
    let (controller, handle) = mount(Arc::clone(&engine), &log, &sink);

    wait_until(|| controller.state().is_terminal()).await;
    assert_eq!(*log.availability.lock(), vec![false]);
    assert_eq!(log.ready.load(Ordering::SeqCst), 0);

    let overlays = vec![Overlay::marker("pickup", mumbai())];
    match controller.render(&overlays) {
        RenderedView::Fallback(fallback) => {
            assert_eq!(fallback.location, "Location: 19.0760, 72.8777");
            assert_eq!(fallback.reason, "Map view component is not available");
            assert_eq!(fallback.overlay_note, OVERLAY_NOTE);
        }
        other => panic!("expected fallback, got {other:?}"),
    }

    // Commands are dropped, never forwarded
    handle.set_camera(CameraRequest::centered(bengaluru()));
    assert!(handle.camera().is_none());
    assert_eq!(engine.views_created(), 0);

    // Availability is reported once even after more renders
    controller.render(&[]);
    assert_eq!(log.availability.lock().len(), 1);
}

// ============================================================================
// Mount Safety
// ============================================================================

/// Unmounting while the check is in flight silences every callback.
#[tokio::test(start_paused = true)]
async fn test_unmount_during_check_is_silent() {
    let engine = Arc::new(
        SimulatedEngine::builder()
            .check_delay(Duration::from_millis(1000))
            .style_loads_immediately()
            .build(),
    );
    let log = Arc::new(HostLog::default());
    let sink = Arc::new(RecordingSink::new());
    let (controller, handle) = mount(Arc::clone(&engine), &log, &sink);

    tokio::time::sleep(Duration::from_millis(100)).await;
    controller.unmount();
    tokio::time::sleep(Duration::from_millis(2000)).await;

    assert_eq!(controller.state(), AvailabilityState::Checking);
    assert!(log.availability.lock().is_empty());
    assert!(log.errors.lock().is_empty());
    assert_eq!(log.ready.load(Ordering::SeqCst), 0);
    assert_eq!(engine.views_created(), 0);

    // Late engine events and commands are harmless
    assert!(!engine.emit_style_loaded());
    handle.set_camera(CameraRequest::centered(bengaluru()));
    assert!(handle.camera().is_none());
}

/// Two mounts of the same engine keep separate state.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_mounts_are_independent() {
    let engine = Arc::new(SimulatedEngine::builder().style_loads_immediately().build());
    let first_log = Arc::new(HostLog::default());
    let second_log = Arc::new(HostLog::default());
    let sink = Arc::new(RecordingSink::new());

    let (first, _) = mount(Arc::clone(&engine), &first_log, &sink);
    let (second, second_handle) = mount(Arc::clone(&engine), &second_log, &sink);
    assert_ne!(first.mount_id(), second.mount_id());

    wait_until(|| second_log.ready.load(Ordering::SeqCst) == 1).await;
    first.unmount();

    second_handle.set_camera(CameraRequest::centered(bengaluru()));
    assert_eq!(second_handle.camera().unwrap().center, bengaluru());
    assert!(second.render(&[]).is_live());
}

// ============================================================================
// Ride Overlays
// ============================================================================

/// A ride from the mock API mounts its markers and frames its trip.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_ride_overlays_on_live_map() {
    let api = MockRideApi::instant();
    let ride = api.fetch_rides().await.unwrap().remove(0);

    let engine = Arc::new(SimulatedEngine::builder().style_loads_immediately().build());
    let log = Arc::new(HostLog::default());
    let sink = Arc::new(RecordingSink::new());
    let (controller, handle) = mount(Arc::clone(&engine), &log, &sink);
    wait_until(|| log.ready.load(Ordering::SeqCst) == 1).await;

    let overlays = ride_overlays(&ride);
    let view = controller.render(&overlays);
    let live = view.as_live().expect("live map");
    assert_eq!(live.overlays.len(), 3);
    assert!(live.skipped_overlays.is_empty());

    let (ne, sw) = ride_bounds(&ride).unwrap();
    handle.fit_bounds(ne, sw, None);
    let camera = handle.camera().unwrap();
    assert_eq!(camera.padding.unwrap().bottom, 50.0);
    assert!(camera.center.lat() <= ne.lat() && camera.center.lat() >= sw.lat());
}
