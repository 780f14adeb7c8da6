//! Mock ride and provider data.
//!
//! Stand-in for the ride backend: fixed lists returned after a fixed delay.
//! There is no matching, pricing or discovery logic here.

mod fixtures;
mod types;

pub use types::{Place, Provider, Ride, RideStatus, VehicleType};

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::coord::bounding_corners;
use crate::engine::BoxFuture;
use crate::overlay::Overlay;

/// Delay applied by [`MockRideApi`] unless configured otherwise.
pub const DEFAULT_MOCK_DELAY_MS: u64 = 1000;

/// Errors from the ride API.
#[derive(Debug, Error)]
pub enum RideApiError {
    /// No ride with the requested id.
    #[error("Ride not found: {0}")]
    NotFound(String),
}

/// Ride and provider queries.
pub trait RideApi: Send + Sync {
    /// All rides for the current user.
    fn fetch_rides(&self) -> BoxFuture<'_, Result<Vec<Ride>, RideApiError>>;

    /// One ride by id.
    fn fetch_ride<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Ride, RideApiError>>;

    /// Providers near the user.
    fn fetch_providers(&self) -> BoxFuture<'_, Result<Vec<Provider>, RideApiError>>;
}

/// Returns the built-in fixtures after a fixed delay.
#[derive(Debug, Clone)]
pub struct MockRideApi {
    delay: Duration,
}

impl Default for MockRideApi {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_MOCK_DELAY_MS))
    }
}

impl MockRideApi {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No delay; for tests and scripted runs.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl RideApi for MockRideApi {
    fn fetch_rides(&self) -> BoxFuture<'_, Result<Vec<Ride>, RideApiError>> {
        Box::pin(async move {
            self.wait().await;
            let rides = fixtures::rides();
            debug!(count = rides.len(), "Fetched mock rides");
            Ok(rides)
        })
    }

    fn fetch_ride<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Ride, RideApiError>> {
        Box::pin(async move {
            self.wait().await;
            fixtures::rides()
                .into_iter()
                .find(|r| r.id == id)
                .ok_or_else(|| RideApiError::NotFound(id.to_string()))
        })
    }

    fn fetch_providers(&self) -> BoxFuture<'_, Result<Vec<Provider>, RideApiError>> {
        Box::pin(async move {
            self.wait().await;
            let providers = fixtures::providers();
            debug!(count = providers.len(), "Fetched mock providers");
            Ok(providers)
        })
    }
}

/// Pickup and drop-off markers plus the route line for a ride.
pub fn ride_overlays(ride: &Ride) -> Vec<Overlay> {
    vec![
        Overlay::Marker {
            id: format!("{}-pickup", ride.id),
            coordinate: ride.pickup.coordinate,
            title: Some(ride.pickup.name.clone()),
        },
        Overlay::Marker {
            id: format!("{}-destination", ride.id),
            coordinate: ride.destination.coordinate,
            title: Some(ride.destination.name.clone()),
        },
        Overlay::route(
            format!("{}-route", ride.id),
            vec![ride.pickup.coordinate, ride.destination.coordinate],
        ),
    ]
}

/// Markers for a set of providers.
pub fn provider_overlays(providers: &[Provider]) -> Vec<Overlay> {
    providers
        .iter()
        .map(|p| Overlay::Marker {
            id: format!("provider-{}", p.id),
            coordinate: p.location,
            title: Some(p.name.clone()),
        })
        .collect()
}

/// Corners framing a ride's pickup and destination, for `fit_bounds`.
pub fn ride_bounds(ride: &Ride) -> Option<(crate::coord::Coordinate, crate::coord::Coordinate)> {
    bounding_corners(&[ride.pickup.coordinate, ride.destination.coordinate])
}
