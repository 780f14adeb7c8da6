//! Ridemap - map availability controller for ride apps
//!
//! A map screen in a ride app must keep working when the map engine does not.
//! This crate decides, per mount, whether a pluggable map engine can be used,
//! gates camera commands and overlays until it is ready, and otherwise renders
//! a fallback that still shows the location as text.
//!
//! # Modules
//!
//! - [`controller`] - the availability state machine, [`MapHandle`] and the
//!   render policy
//! - [`engine`] - the [`MapEngine`]/[`MapView`] seam and a simulated engine
//! - [`coord`], [`camera`], [`overlay`] - value types passed to the engine
//! - [`diagnostics`] - injected logging sink for controller events
//! - [`config`], [`logging`] - INI configuration and tracing setup
//! - [`session`], [`rides`], [`relay`] - thin collaborators used by the CLI
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ridemap::camera::CameraRequest;
//! use ridemap::controller::{MapCallbacks, MapController};
//! use ridemap::coord::Coordinate;
//! use ridemap::engine::SimulatedEngine;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Arc::new(SimulatedEngine::builder().style_loads_immediately().build());
//! let mumbai = Coordinate::new(72.8777, 19.0760)?;
//!
//! let (controller, handle) = MapController::builder(engine, mumbai)
//!     .callbacks(MapCallbacks::new().on_map_ready(|| println!("ready")))
//!     .mount();
//!
//! handle.set_camera(CameraRequest::centered(Coordinate::new(77.5946, 12.9716)?).with_zoom(12.0));
//! let view = controller.render(&[]);
//! println!("{view:?}");
//! # Ok(())
//! # }
//! ```

pub mod camera;
pub mod config;
pub mod controller;
pub mod coord;
pub mod diagnostics;
pub mod engine;
pub mod logging;
pub mod overlay;
pub mod relay;
pub mod rides;
pub mod session;

pub use controller::{MapController, MapHandle};
pub use engine::{MapEngine, MapView};
