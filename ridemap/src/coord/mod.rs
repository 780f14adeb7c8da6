//! Geographic coordinates.
//!
//! Provides the validated [`Coordinate`] value type shared by the controller,
//! camera commands, overlays and the mock ride API, plus a few helpers for
//! framing groups of points.

mod types;

pub use types::{CoordError, Coordinate, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Computes the `(northeast, southwest)` corners enclosing all points.
///
/// Returns `None` for an empty slice. A single point yields a degenerate box,
/// which callers pass to `fit_bounds` at their own risk.
pub fn bounding_corners(points: &[Coordinate]) -> Option<(Coordinate, Coordinate)> {
    let first = points.first()?;
    let (mut min_lng, mut max_lng) = (first.lng(), first.lng());
    let (mut min_lat, mut max_lat) = (first.lat(), first.lat());

    for p in &points[1..] {
        min_lng = min_lng.min(p.lng());
        max_lng = max_lng.max(p.lng());
        min_lat = min_lat.min(p.lat());
        max_lat = max_lat.max(p.lat());
    }

    // Components come from already-validated coordinates.
    let ne = Coordinate::new(max_lng, max_lat).ok()?;
    let sw = Coordinate::new(min_lng, min_lat).ok()?;
    Some((ne, sw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mumbai_is_valid() {
        let result = Coordinate::new(72.8777, 19.0760);
        assert!(result.is_ok(), "Valid coordinates should not error");

        let c = result.unwrap();
        assert_eq!(c.lng(), 72.8777);
        assert_eq!(c.lat(), 19.0760);
    }

    #[test]
    fn test_invalid_latitude() {
        let result = Coordinate::new(0.0, 90.5);
        assert!(matches!(result.unwrap_err(), CoordError::InvalidLatitude(_)));
    }

    #[test]
    fn test_invalid_longitude() {
        let result = Coordinate::new(-180.01, 0.0);
        assert!(matches!(
            result.unwrap_err(),
            CoordError::InvalidLongitude(_)
        ));
    }

    #[test]
    fn test_nan_rejected() {
        assert_eq!(
            Coordinate::new(f64::NAN, 0.0).unwrap_err(),
            CoordError::NotFinite
        );
        assert_eq!(
            Coordinate::new(0.0, f64::INFINITY).unwrap_err(),
            CoordError::NotFinite
        );
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        assert!(Coordinate::new(180.0, 90.0).is_ok());
        assert!(Coordinate::new(-180.0, -90.0).is_ok());
    }

    #[test]
    fn test_display_lat_lng_four_decimals() {
        let c = Coordinate::new(72.8777, 19.076).unwrap();
        assert_eq!(c.display_lat_lng(), "19.0760, 72.8777");
    }

    #[test]
    fn test_serde_uses_lng_lat_pair() {
        let c = Coordinate::new(77.5946, 12.9716).unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "[77.5946,12.9716]");

        let bad: Result<Coordinate, _> = serde_json::from_str("[200.0,0.0]");
        assert!(bad.is_err());
    }

    #[test]
    fn test_bounding_corners() {
        let points = [
            Coordinate::new(72.8777, 19.0760).unwrap(),
            Coordinate::new(77.5946, 12.9716).unwrap(),
            Coordinate::new(73.8567, 18.5204).unwrap(),
        ];

        let (ne, sw) = bounding_corners(&points).unwrap();
        assert_eq!(ne.lng(), 77.5946);
        assert_eq!(ne.lat(), 19.0760);
        assert_eq!(sw.lng(), 72.8777);
        assert_eq!(sw.lat(), 12.9716);
    }

    #[test]
    fn test_bounding_corners_empty() {
        assert!(bounding_corners(&[]).is_none());
    }

    proptest! {
        #[test]
        fn prop_in_range_always_accepted(lng in -180.0f64..=180.0, lat in -90.0f64..=90.0) {
            let c = Coordinate::new(lng, lat).unwrap();
            prop_assert_eq!(c.lng(), lng);
            prop_assert_eq!(c.lat(), lat);
        }

        #[test]
        fn prop_out_of_range_latitude_rejected(lat in 90.0001f64..1000.0) {
            prop_assert!(Coordinate::new(0.0, lat).is_err());
            prop_assert!(Coordinate::new(0.0, -lat).is_err());
        }
    }
}
