//! Coordinates and great-circle distance
//!
//! Distances are computed with the haversine formula on a spherical Earth,
//! which is accurate to well under one percent for the city-scale and
//! continental-scale comparisons the resolver makes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::geo::{EARTH_RADIUS_KM, KM_PER_MILE};
use crate::errors::{LocationError, LocationResult};

/// A point on the Earth's surface in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a validated coordinate
    ///
    /// # Errors
    ///
    /// Returns `LocationError::InvalidCoordinate` if either component is not
    /// finite or lies outside its range.
    pub fn new(latitude: f64, longitude: f64) -> LocationResult<Self> {
        let coordinate = Self {
            latitude,
            longitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check that the coordinate lies within the valid ranges
    pub fn validate(&self) -> LocationResult<()> {
        let latitude_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let longitude_ok =
            self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if latitude_ok && longitude_ok {
            Ok(())
        } else {
            Err(LocationError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Whether the coordinate is within the valid ranges
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two coordinates in kilometres
///
/// The result is symmetric in its arguments, never negative, and zero for
/// identical points.
///
/// # Errors
///
/// Returns `LocationError::InvalidCoordinate` for the first out-of-range input.
pub fn distance(a: Coordinate, b: Coordinate) -> LocationResult<f64> {
    a.validate()?;
    b.validate()?;

    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points
    let central_angle = 2.0 * h.sqrt().min(1.0).asin();

    Ok(EARTH_RADIUS_KM * central_angle)
}

/// Convert kilometres to statute miles
pub fn km_to_miles(km: f64) -> f64 {
    km / KM_PER_MILE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::geo::DISTANCE_EPSILON_KM;

    fn coord(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude).unwrap()
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            (coord(40.7, -74.0), coord(37.8, -122.4)),
            (coord(51.5074, -0.1278), coord(48.8566, 2.3522)),
            (coord(-33.8688, 151.2093), coord(35.6762, 139.6503)),
            (coord(0.0, 179.9), coord(0.0, -179.9)),
        ];

        for (a, b) in pairs {
            let forward = distance(a, b).unwrap();
            let backward = distance(b, a).unwrap();
            assert!((forward - backward).abs() < DISTANCE_EPSILON_KM);
            assert!(forward >= 0.0);
        }
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for point in [coord(0.0, 0.0), coord(90.0, 180.0), coord(-45.3, 12.9)] {
            assert!(distance(point, point).unwrap().abs() < DISTANCE_EPSILON_KM);
        }
    }

    #[test]
    fn test_known_distance() {
        // London to Paris is roughly 344 km
        let london = coord(51.5074, -0.1278);
        let paris = coord(48.8566, 2.3522);
        let km = distance(london, paris).unwrap();
        assert!((km - 343.5).abs() < 2.0, "got {km}");
        assert!((km_to_miles(km) - 213.5).abs() < 2.0);
    }

    #[test]
    fn test_antimeridian_is_short() {
        // Planar math would call this ~40,000 km; on the sphere it is ~22 km
        let km = distance(coord(0.0, 179.9), coord(0.0, -179.9)).unwrap();
        assert!(km < 25.0, "got {km}");
    }

    #[test]
    fn test_distance_is_monotonic_along_meridian() {
        let origin = coord(10.0, 20.0);
        let near = distance(origin, coord(11.0, 20.0)).unwrap();
        let far = distance(origin, coord(15.0, 20.0)).unwrap();
        let farther = distance(origin, coord(40.0, 20.0)).unwrap();
        assert!(near < far && far < farther);
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        assert!(Coordinate::new(90.5, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.01).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());

        let bad = Coordinate {
            latitude: 123.0,
            longitude: 0.0,
        };
        let result = distance(bad, coord(0.0, 0.0));
        assert_eq!(
            result,
            Err(LocationError::InvalidCoordinate {
                latitude: 123.0,
                longitude: 0.0
            })
        );
        assert!(distance(coord(0.0, 0.0), bad).is_err());
    }

    #[test]
    fn test_boundaries_are_valid() {
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
    }
}
