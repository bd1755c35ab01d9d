//! Coordinate validation and great-circle distance

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters (IUGG)
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A WGS-84 coordinate pair.
///
/// Backend data can carry zeroed or out-of-range coordinates, so every
/// consumer checks [`Coordinate::is_valid`] before doing geometry with one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both components are finite, in range, and not the (0, 0)
    /// null-island placeholder some servers emit for unknown locations.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
            && !(self.latitude == 0.0 && self.longitude == 0.0)
    }
}

/// Haversine great-circle distance between two coordinates, in meters.
pub fn great_circle_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinate() {
        assert!(Coordinate::new(34.2357, -118.5637).is_valid());
        assert!(Coordinate::new(-89.9, 179.9).is_valid());
    }

    #[test]
    fn test_null_island_is_invalid() {
        assert!(!Coordinate::new(0.0, 0.0).is_valid());
    }

    #[test]
    fn test_out_of_range_is_invalid() {
        assert!(!Coordinate::new(90.1, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 10.0).is_valid());
    }

    #[test]
    fn test_distance_zero_for_same_point() {
        let p = Coordinate::new(40.0, -73.0);
        assert_eq!(great_circle_distance(p, p), 0.0);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        // One degree of latitude is roughly 111.2 km
        let a = Coordinate::new(34.0, -118.0);
        let b = Coordinate::new(35.0, -118.0);
        let d = great_circle_distance(a, b);
        assert!((d - 111_195.0).abs() < 300.0, "got {d}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinate::new(34.2357, -118.5637);
        let b = Coordinate::new(34.5, -118.0);
        let d_ab = great_circle_distance(a, b);
        let d_ba = great_circle_distance(b, a);
        assert!((d_ab - d_ba).abs() < 1e-9);
    }
}
