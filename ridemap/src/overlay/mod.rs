//! Overlay content drawn on top of a live map.
//!
//! Overlays belong to the hosting screen. The controller only decides whether
//! they are mounted (live map) or withheld (loading, fallback).

use crate::coord::Coordinate;

/// A marker, route line or user-location indicator.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Point annotation, e.g. pickup or drop-off pin.
    Marker {
        id: String,
        coordinate: Coordinate,
        title: Option<String>,
    },
    /// Line drawn through a sequence of points.
    Route {
        id: String,
        path: Vec<Coordinate>,
        color: Option<String>,
        width: f64,
    },
    /// The device's own position indicator.
    UserLocation { show_heading: bool },
}

/// The engine primitive an overlay needs in order to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPrimitive {
    PointAnnotation,
    ShapeLayer,
    UserLocation,
}

impl Overlay {
    /// A marker with no title.
    pub fn marker(id: impl Into<String>, coordinate: Coordinate) -> Self {
        Overlay::Marker {
            id: id.into(),
            coordinate,
            title: None,
        }
    }

    /// A route with the default line style.
    pub fn route(id: impl Into<String>, path: Vec<Coordinate>) -> Self {
        Overlay::Route {
            id: id.into(),
            path,
            color: None,
            width: 4.0,
        }
    }

    /// Primitive required to draw this overlay.
    pub fn primitive(&self) -> OverlayPrimitive {
        match self {
            Overlay::Marker { .. } => OverlayPrimitive::PointAnnotation,
            Overlay::Route { .. } => OverlayPrimitive::ShapeLayer,
            Overlay::UserLocation { .. } => OverlayPrimitive::UserLocation,
        }
    }

    /// Identifier used in logs.
    pub fn label(&self) -> &str {
        match self {
            Overlay::Marker { id, .. } | Overlay::Route { id, .. } => id,
            Overlay::UserLocation { .. } => "user-location",
        }
    }
}
