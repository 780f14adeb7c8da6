//! Ride and provider records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coord::Coordinate;

/// A named location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub coordinate: Coordinate,
}

/// Lifecycle of a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    Requested,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RideStatus::Requested => "Requested",
            RideStatus::Accepted => "Accepted",
            RideStatus::InProgress => "In progress",
            RideStatus::Completed => "Completed",
            RideStatus::Cancelled => "Cancelled",
        }
    }
}

/// Kind of vehicle a provider drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Bike,
    Auto,
    Car,
}

/// A ride request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub id: String,
    pub pickup: Place,
    pub destination: Place,
    pub status: RideStatus,
    /// Fare in rupees.
    pub fare: f64,
    pub distance_km: f64,
    pub requested_at: DateTime<Utc>,
    pub provider_id: Option<String>,
}

/// A driver or partner offering rides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub vehicle: VehicleType,
    pub rating: f32,
    pub location: Coordinate,
    pub eta_minutes: u32,
}
