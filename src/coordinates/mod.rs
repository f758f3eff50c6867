//! Coordinate frames
//!
//! Equatorial, ecliptic and horizon sky coordinates plus the observer's
//! geographic [`Location`]. All angles are in degrees.

pub mod angle;
mod ecliptic;
mod equatorial;
mod geographic;
mod horizon;

pub use ecliptic::EclipticCoordinate;
pub use equatorial::EquatorialCoordinate;
pub use geographic::Location;
pub use horizon::{refraction, HorizonCoordinate};

use crate::constants::RAD2DEG;
use nalgebra::Vector3;
use thiserror::Error;

/// Error type for coordinate construction
#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Latitude must be within [-90, 90] degrees, got {0}")]
    InvalidLatitude(f64),

    #[error("Longitude must be within [-180, 180] degrees, got {0}")]
    InvalidLongitude(f64),
}

/// A direction on the unit sphere in some reference frame
pub trait SphericalFrame: Sized {
    fn to_unit_vector(&self) -> Vector3<f64>;
    fn from_unit_vector(vector: &Vector3<f64>) -> Self;

    /// Angular separation in degrees
    fn angle_between(&self, other: &Self) -> f64 {
        let v1 = self.to_unit_vector();
        let v2 = other.to_unit_vector();
        let cos_angle = v1.dot(&v2) / (v1.norm() * v2.norm());

        // Handle numerical precision issues
        cos_angle.clamp(-1.0, 1.0).acos() * RAD2DEG
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_angular_distance() {
        let p1 = EquatorialCoordinate::new(30.0, 60.0);
        assert_abs_diff_eq!(p1.angle_between(&p1), 0.0, epsilon = 1e-6);

        let p2 = EquatorialCoordinate::new(-30.0, 240.0);
        assert_abs_diff_eq!(p1.angle_between(&p2), 180.0, epsilon = 1e-6);

        let polaris = EquatorialCoordinate::new(89.26, 37.95);
        let vega = EquatorialCoordinate::new(38.78, 279.23);
        assert_abs_diff_eq!(polaris.angle_between(&vega), 51.0, epsilon = 1.0);
    }

    #[test]
    fn test_unit_vector_round_trip() {
        let eq = EquatorialCoordinate::new(-12.5, 301.25);
        let back = EquatorialCoordinate::from_unit_vector(&eq.to_unit_vector());
        assert_abs_diff_eq!(back.declination, eq.declination, epsilon = 1e-9);
        assert_abs_diff_eq!(back.right_ascension, eq.right_ascension, epsilon = 1e-9);
    }
}
