use super::angle::{asin_deg, atan2_deg, clamp_latitude, cos_deg, normalize_degrees, sin_deg};
use super::{EquatorialCoordinate, SphericalFrame};
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// A position relative to the plane of Earth's orbit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipticCoordinate {
    /// Ecliptic latitude in degrees, [-90, 90]
    pub latitude: f64,
    /// Ecliptic longitude in degrees, [0, 360)
    pub longitude: f64,
}

impl EclipticCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: clamp_latitude(latitude),
            longitude: normalize_degrees(longitude),
        }
    }

    /// Rotate about the equinox axis by the obliquity into the equatorial frame
    pub fn to_equatorial(&self, obliquity: f64) -> EquatorialCoordinate {
        let rotation = Rotation3::from_axis_angle(&Vector3::x_axis(), obliquity.to_radians());
        EquatorialCoordinate::from_unit_vector(&(rotation * self.to_unit_vector()))
    }
}

impl SphericalFrame for EclipticCoordinate {
    fn to_unit_vector(&self) -> Vector3<f64> {
        let cos_lat = cos_deg(self.latitude);
        Vector3::new(
            cos_lat * cos_deg(self.longitude),
            cos_lat * sin_deg(self.longitude),
            sin_deg(self.latitude),
        )
    }

    fn from_unit_vector(vector: &Vector3<f64>) -> Self {
        let v = vector.normalize();
        Self::new(asin_deg(v.z), atan2_deg(v.y, v.x))
    }
}
