//! Static data served by the mock API.

use chrono::{DateTime, Utc};

use super::types::{Place, Provider, Ride, RideStatus, VehicleType};
use crate::coord::Coordinate;

fn place(name: &str, lng: f64, lat: f64) -> Place {
    Place {
        name: name.to_string(),
        coordinate: Coordinate::from_valid(lng, lat),
    }
}

fn at(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp, 0).unwrap_or_default()
}

pub(super) fn rides() -> Vec<Ride> {
    vec![
        Ride {
            id: "ride-1001".to_string(),
            pickup: place("Chhatrapati Shivaji Terminus", 72.8355, 18.9398),
            destination: place("Bandra Kurla Complex", 72.8656, 19.0678),
            status: RideStatus::Completed,
            fare: 342.0,
            distance_km: 17.4,
            requested_at: at(1_736_920_800),
            provider_id: Some("p-01".to_string()),
        },
        Ride {
            id: "ride-1002".to_string(),
            pickup: place("Andheri Station", 72.8468, 19.1197),
            destination: place("Powai Lake", 72.9050, 19.1273),
            status: RideStatus::Accepted,
            fare: 186.5,
            distance_km: 8.2,
            requested_at: at(1_737_007_200),
            provider_id: Some("p-02".to_string()),
        },
        Ride {
            id: "ride-1003".to_string(),
            pickup: place("Gateway of India", 72.8347, 18.9220),
            destination: place("Juhu Beach", 72.8266, 19.0988),
            status: RideStatus::Requested,
            fare: 410.0,
            distance_km: 21.9,
            requested_at: at(1_737_093_600),
            provider_id: None,
        },
    ]
}

pub(super) fn providers() -> Vec<Provider> {
    vec![
        Provider {
            id: "p-01".to_string(),
            name: "Arjun".to_string(),
            vehicle: VehicleType::Car,
            rating: 4.8,
            location: Coordinate::from_valid(72.8777, 19.0760),
            eta_minutes: 4,
        },
        Provider {
            id: "p-02".to_string(),
            name: "Meera".to_string(),
            vehicle: VehicleType::Auto,
            rating: 4.6,
            location: Coordinate::from_valid(72.8712, 19.0821),
            eta_minutes: 6,
        },
        Provider {
            id: "p-03".to_string(),
            name: "Kabir".to_string(),
            vehicle: VehicleType::Bike,
            rating: 4.9,
            location: Coordinate::from_valid(72.8825, 19.0702),
            eta_minutes: 3,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_coordinates_are_valid() {
        for ride in rides() {
            for c in [ride.pickup.coordinate, ride.destination.coordinate] {
                assert!(Coordinate::new(c.lng(), c.lat()).is_ok());
            }
        }
        for p in providers() {
            assert!(Coordinate::new(p.location.lng(), p.location.lat()).is_ok());
        }
    }

    #[test]
    fn test_ride_ids_unique() {
        let mut ids: Vec<String> = rides().into_iter().map(|r| r.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }
}
