//! Coordinate types and validation errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors produced when constructing a [`Coordinate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Longitude outside [-180, 180].
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),

    /// Latitude outside [-90, 90].
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// NaN or infinite component.
    #[error("Coordinate components must be finite")]
    NotFinite,
}

/// A geographic position stored as `(longitude, latitude)`.
///
/// Longitude comes first, matching the GeoJSON ordering every map engine we
/// target expects. Values are validated on construction and immutable after.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", try_from = "[f64; 2]")]
pub struct Coordinate {
    lng: f64,
    lat: f64,
}

impl Coordinate {
    /// Creates a coordinate from longitude and latitude in degrees.
    pub fn new(lng: f64, lat: f64) -> Result<Self, CoordError> {
        if !lng.is_finite() || !lat.is_finite() {
            return Err(CoordError::NotFinite);
        }
        if !(MIN_LON..=MAX_LON).contains(&lng) {
            return Err(CoordError::InvalidLongitude(lng));
        }
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        Ok(Self { lng, lat })
    }

    /// Build from components already known to be in range.
    pub(crate) const fn from_valid(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Longitude in degrees.
    #[inline]
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Latitude in degrees.
    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Human-readable `"lat, lng"` with four decimal places.
    ///
    /// Latitude is printed first here, unlike the storage order.
    pub fn display_lat_lng(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.lng, self.lat)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lng, c.lat]
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = CoordError;

    fn try_from(pair: [f64; 2]) -> Result<Self, Self::Error> {
        Coordinate::new(pair[0], pair[1])
    }
}

impl TryFrom<(f64, f64)> for Coordinate {
    type Error = CoordError;

    fn try_from((lng, lat): (f64, f64)) -> Result<Self, Self::Error> {
        Coordinate::new(lng, lat)
    }
}
