//! Geographic coordinate value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the earth, in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

/// Error type for invalid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCoordinates;

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180"
        )
    }
}

impl std::error::Error for InvalidCoordinates {}

impl Coordinate {
    /// Create a new coordinate with validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if latitude is not in [-90, 90],
    /// longitude is not in [-180, 180], or either value is not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a coordinate from a GeoJSON position (`[longitude, latitude]`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if the position has fewer than two
    /// elements or the values are out of range.
    pub fn from_geojson(position: &[f64]) -> Result<Self, InvalidCoordinates> {
        match position {
            [longitude, latitude, ..] => Self::new(*latitude, *longitude),
            _ => Err(InvalidCoordinates),
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        let coord = Coordinate::new(59.91, 10.75).expect("valid coordinates");
        assert!((coord.latitude() - 59.91).abs() < f64::EPSILON);
        assert!((coord.longitude() - 10.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boundary_coordinates() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_invalid_latitude() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(-91.0, 0.0).is_err());
    }

    #[test]
    fn test_invalid_longitude() {
        assert!(Coordinate::new(0.0, 181.0).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
    }

    #[test]
    fn test_nan_is_rejected() {
        assert!(Coordinate::new(f64::NAN, 10.0).is_err());
        assert!(Coordinate::new(59.0, f64::NAN).is_err());
    }

    #[test]
    fn test_from_geojson_swaps_order() {
        let coord = Coordinate::from_geojson(&[10.7387, 59.9133]).expect("valid");
        assert!((coord.latitude() - 59.9133).abs() < f64::EPSILON);
        assert!((coord.longitude() - 10.7387).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_geojson_too_short() {
        assert!(Coordinate::from_geojson(&[10.0]).is_err());
        assert!(Coordinate::from_geojson(&[]).is_err());
    }

    #[test]
    fn test_display() {
        let coord = Coordinate::new(59.91, 10.75).expect("valid");
        let display = format!("{coord}");
        assert!(display.contains("59.91"));
        assert!(display.contains("10.75"));
    }
}
