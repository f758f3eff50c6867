use super::angle::{clamp_latitude, delta_angle};
use super::CoordinateError;
use serde::Serialize;

/// An observer's position on Earth in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Create a location, rejecting latitudes outside [-90, 90] and longitudes
    /// outside [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Clamp the latitude into [-90, 90] and wrap the longitude into (-180, 180]
    pub fn constrained(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: clamp_latitude(latitude),
            longitude: delta_angle(0.0, longitude),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn is_northern_hemisphere(&self) -> bool {
        self.latitude >= 0.0
    }
}
