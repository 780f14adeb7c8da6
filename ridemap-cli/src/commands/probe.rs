//! Probe command - mount a map on the simulated engine and report.
//!
//! Useful for seeing exactly what a host screen would receive for a given
//! engine condition: the callbacks that fire, the view that renders and the
//! diagnostics the controller writes.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use console::style;
use ridemap::camera::CameraRequest;
use ridemap::controller::{AvailabilityState, MapCallbacks, MapController, RenderedView};
use ridemap::coord::Coordinate;
use ridemap::diagnostics::{DiagnosticSink, RecordingSink, Severity, TracingSink};
use ridemap::engine::{MapEngine, SimulatedEngine};
use ridemap::overlay::Overlay;
use ridemap::rides::{provider_overlays, MockRideApi, RideApi};
use tokio::sync::mpsc;

use crate::error::CliError;
use crate::runner::CliRunner;

/// How long to wait for the mount to settle beyond the check delay.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Arguments for the probe command.
#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Initial longitude
    #[arg(long, default_value_t = 72.8777, allow_negative_numbers = true)]
    pub lng: f64,

    /// Initial latitude
    #[arg(long, default_value_t = 19.0760, allow_negative_numbers = true)]
    pub lat: f64,

    /// Simulate an engine whose view component failed to load
    #[arg(long)]
    pub missing_view: bool,

    /// Simulate an unsupported platform
    #[arg(long)]
    pub unsupported_platform: bool,

    /// Make live view construction fail
    #[arg(long)]
    pub fail_construction: bool,

    /// Delay the availability check by this many milliseconds
    #[arg(long, default_value_t = 0)]
    pub check_delay_ms: u64,

    /// Delay the style-loaded signal by this many milliseconds
    #[arg(long, default_value_t = 100)]
    pub style_delay_ms: u64,

    /// Unmount straight after mounting, before the check resolves
    #[arg(long)]
    pub unmount_early: bool,

    /// Move the camera here once the map is ready
    #[arg(long, num_args = 2, value_names = ["LNG", "LAT"], allow_negative_numbers = true)]
    pub fly_to: Option<Vec<f64>>,
}

impl ProbeArgs {
    fn engine(&self) -> SimulatedEngine {
        let mut builder = SimulatedEngine::builder()
            .style_loads_after(Duration::from_millis(self.style_delay_ms));
        if self.missing_view {
            builder = builder.without_view();
        }
        if self.unsupported_platform {
            builder = builder.unsupported_platform();
        }
        if self.fail_construction {
            builder = builder.fail_construction("simulated construction failure");
        }
        if self.check_delay_ms > 0 {
            builder = builder.check_delay(Duration::from_millis(self.check_delay_ms));
        }
        builder.build()
    }

    fn fly_to(&self) -> Result<Option<Coordinate>, CliError> {
        match self.fly_to.as_deref() {
            Some([lng, lat]) => Coordinate::new(*lng, *lat)
                .map(Some)
                .map_err(|e| CliError::InvalidArgument(format!("--fly-to: {}", e))),
            Some(_) => Err(CliError::InvalidArgument(
                "--fly-to takes a longitude and a latitude".to_string(),
            )),
            None => Ok(None),
        }
    }
}

/// Forwards to tracing and keeps a copy for the report.
struct ProbeSink {
    recording: RecordingSink,
}

impl DiagnosticSink for ProbeSink {
    fn record(&self, severity: Severity, mount_id: u64, message: &str) {
        TracingSink.record(severity, mount_id, message);
        self.recording.record(severity, mount_id, message);
    }
}

/// Run the probe command.
pub fn run(args: ProbeArgs, verbose: bool) -> Result<(), CliError> {
    let initial = Coordinate::new(args.lng, args.lat)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let fly_to = args.fly_to()?;

    let runner = CliRunner::new(verbose)?;
    runner.log_startup("probe");
    let map_config = runner.config().map_config();

    let engine = Arc::new(args.engine());
    let sink = Arc::new(ProbeSink {
        recording: RecordingSink::new(),
    });
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<String>();
    let callbacks = callback_log(events_tx);

    let (controller, handle) =
        MapController::builder(Arc::clone(&engine) as Arc<dyn MapEngine>, initial)
            .config(map_config)
            .callbacks(callbacks)
            .sink(Arc::clone(&sink) as Arc<dyn DiagnosticSink>)
            .mount_on(runner.runtime().handle());

    println!(
        "Mounted map #{} at {} ({})",
        controller.mount_id(),
        initial.display_lat_lng(),
        engine.name()
    );

    let deadline = SETTLE_TIMEOUT + Duration::from_millis(args.check_delay_ms + args.style_delay_ms);
    let overlays = runner.runtime().block_on(async {
        if args.unmount_early {
            controller.unmount();
            // Give a pending check the chance to misbehave.
            tokio::time::sleep(Duration::from_millis(args.check_delay_ms + 50)).await;
        } else {
            wait_for_settle(&controller, deadline).await;
        }

        let mut overlays = vec![Overlay::marker("you", initial)];
        match MockRideApi::instant().fetch_providers().await {
            Ok(providers) => overlays.extend(provider_overlays(&providers)),
            Err(e) => tracing::warn!(error = %e, "Could not load providers"),
        }
        overlays
    });

    if let Some(target) = fly_to {
        handle.set_camera(CameraRequest::centered(target));
    }

    let view = controller.render(&overlays);
    let state = controller.state();

    println!();
    println!("State:  {}", status_label(&state));
    if let Some(reason) = state.reason() {
        println!("Reason: {}", reason);
    }
    println!();
    print_view(&view);

    println!();
    println!("Callbacks");
    println!("─────────");
    let mut fired = 0;
    while let Ok(event) = events_rx.try_recv() {
        println!("  {}", event);
        fired += 1;
    }
    if fired == 0 {
        println!("  (none)");
    }

    println!();
    println!("Diagnostics");
    println!("───────────");
    for entry in sink.recording.entries() {
        println!("  [{:<5}] {}", entry.severity, entry.message);
    }

    controller.unmount();
    Ok(())
}

fn callback_log(tx: mpsc::UnboundedSender<String>) -> MapCallbacks {
    let (ready_tx, error_tx) = (tx.clone(), tx.clone());
    MapCallbacks::new()
        .on_availability_change(move |available| {
            let _ = tx.send(format!("on_availability_change({})", available));
        })
        .on_map_ready(move || {
            let _ = ready_tx.send("on_map_ready()".to_string());
        })
        .on_error(move |e| {
            let _ = error_tx.send(format!("on_error({})", e));
        })
}

async fn wait_for_settle(controller: &MapController, deadline: Duration) {
    let start = tokio::time::Instant::now();
    while start.elapsed() < deadline {
        let state = controller.state();
        if state.is_terminal() || (state.is_available() && !controller.is_loading()) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tracing::warn!("Map did not settle before the probe deadline");
}

fn status_label(state: &AvailabilityState) -> String {
    let label = state.display_status();
    match state {
        AvailabilityState::Available => style(label).green().bold().to_string(),
        AvailabilityState::Checking => style(label).yellow().to_string(),
        _ => style(label).red().bold().to_string(),
    }
}

fn print_view(view: &RenderedView) {
    match view {
        RenderedView::Loading { message } => {
            println!("View: {}", style("loading").yellow());
            println!("  {}", message);
        }
        RenderedView::Fallback(fallback) => {
            println!("View: {}", style("fallback").red());
            println!("  {}", fallback.reason);
            println!("  {}", fallback.location);
            println!("  {}", style(fallback.overlay_note).dim());
            if let Some(detail) = &fallback.detail {
                println!("  Detail: {}", detail);
            }
        }
        RenderedView::LiveMap(live) => {
            println!("View: {}", style("live map").green());
            println!("  Style:    {}", live.style_url);
            println!(
                "  Camera:   {} @ zoom {}",
                live.camera.center.display_lat_lng(),
                live.camera.zoom_level
            );
            println!("  Overlays: {}", live.overlays.len());
            for overlay in &live.overlays {
                println!("    - {}", overlay.label());
            }
            if !live.skipped_overlays.is_empty() {
                println!("  Skipped:  {}", live.skipped_overlays.join(", "));
            }
        }
    }
}
