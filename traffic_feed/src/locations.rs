//! Catalog of monitored road segments

use serde::Serialize;

/// A monitored location with its map position and typical conditions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Identifier used as `Sample::location_id`
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Typical average speed
    pub base_speed: f64,
    /// Typical congestion percentage
    pub base_congestion: f64,
}

/// Baseline speed for ids that are not in the catalog
pub const DEFAULT_BASE_SPEED: f64 = 30.0;

/// Baseline congestion for ids that are not in the catalog
pub const DEFAULT_BASE_CONGESTION: f64 = 50.0;

const LOCATIONS: [Location; 3] = [
    Location {
        id: "city-center",
        name: "City Center",
        latitude: 51.5074,
        longitude: -0.1278,
        base_speed: 30.0,
        base_congestion: 65.0,
    },
    Location {
        id: "north-highway",
        name: "North Highway",
        latitude: 51.5504,
        longitude: -0.1277,
        base_speed: 45.0,
        base_congestion: 45.0,
    },
    Location {
        id: "south-bridge",
        name: "South Bridge",
        latitude: 51.4974,
        longitude: -0.1278,
        base_speed: 35.0,
        base_congestion: 55.0,
    },
];

/// All monitored locations
pub fn locations() -> &'static [Location] {
    &LOCATIONS
}

/// Look up a location by id
pub fn location(id: &str) -> Option<&'static Location> {
    LOCATIONS.iter().find(|location| location.id == id)
}

/// Baseline `(speed, congestion)` for `id`, falling back to the defaults
pub fn baseline(id: &str) -> (f64, f64) {
    location(id).map_or((DEFAULT_BASE_SPEED, DEFAULT_BASE_CONGESTION), |location| {
        (location.base_speed, location.base_congestion)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog() {
        let ids: Vec<_> = locations().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["city-center", "north-highway", "south-bridge"]);

        let bridge = location("south-bridge").unwrap();
        assert_eq!(bridge.name, "South Bridge");
        assert!(location("ring-road").is_none());
    }

    #[test]
    fn test_baseline_fallback() {
        assert_eq!(baseline("north-highway"), (45.0, 45.0));
        assert_eq!(
            baseline("ring-road"),
            (DEFAULT_BASE_SPEED, DEFAULT_BASE_CONGESTION)
        );
    }
}
