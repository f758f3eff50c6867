use super::angle::{
    asin_deg, atan2_deg, clamp_latitude, cos_deg, normalize_degrees, sin_deg, wrap,
};
use super::{EclipticCoordinate, SphericalFrame};
use crate::nutationlib::simple_obliquity;
use crate::time::{SiderealTime, UniversalTime};
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// A position on the celestial sphere relative to Earth's equator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoordinate {
    /// Declination in degrees, [-90, 90]
    pub declination: f64,
    /// Right ascension in degrees, [0, 360)
    pub right_ascension: f64,
    /// Whether nutation and aberration are already applied
    pub is_apparent: bool,
}

impl EquatorialCoordinate {
    /// Create a geometric (mean) coordinate
    pub fn new(declination: f64, right_ascension: f64) -> Self {
        Self {
            declination: clamp_latitude(declination),
            right_ascension: normalize_degrees(right_ascension),
            is_apparent: false,
        }
    }

    /// Create a coordinate that already includes nutation and aberration
    pub fn apparent(declination: f64, right_ascension: f64) -> Self {
        Self {
            is_apparent: true,
            ..Self::new(declination, right_ascension)
        }
    }

    /// Build a coordinate from an hour angle (hours) at a local sidereal time
    pub fn from_hour_angle(declination: f64, hour_angle: f64, sidereal: &SiderealTime) -> Self {
        let right_ascension = wrap(sidereal.hours() - hour_angle, 0.0, 24.0) * 15.0;
        Self::new(declination, right_ascension)
    }

    /// Right ascension in hours, [0, 24)
    pub fn right_ascension_hours(&self) -> f64 {
        self.right_ascension / 15.0
    }

    /// Local hour angle in hours, [0, 24)
    pub fn hour_angle(&self, sidereal: &SiderealTime) -> f64 {
        wrap(sidereal.hours() - self.right_ascension_hours(), 0.0, 24.0)
    }

    /// Rotate into the ecliptic frame for a given obliquity
    pub fn to_ecliptic_with_obliquity(&self, obliquity: f64) -> EclipticCoordinate {
        let rotation = Rotation3::from_axis_angle(&Vector3::x_axis(), -obliquity.to_radians());
        EclipticCoordinate::from_unit_vector(&(rotation * self.to_unit_vector()))
    }

    /// Ecliptic coordinate at an instant
    ///
    /// Apparent coordinates have the nutation and aberration longitude
    /// correction removed so the result is the geometric ecliptic position.
    pub fn to_ecliptic(&self, ut: &UniversalTime) -> EclipticCoordinate {
        let t = ut.to_julian_centuries();
        let ecliptic = self.to_ecliptic_with_obliquity(simple_obliquity(t));
        if !self.is_apparent {
            return ecliptic;
        }
        let omega = 125.04 - 1934.136 * t;
        EclipticCoordinate::new(
            ecliptic.latitude,
            ecliptic.longitude + 0.00569 + 0.00478 * sin_deg(omega),
        )
    }
}

impl SphericalFrame for EquatorialCoordinate {
    fn to_unit_vector(&self) -> Vector3<f64> {
        let cos_dec = cos_deg(self.declination);
        Vector3::new(
            cos_dec * cos_deg(self.right_ascension),
            cos_dec * sin_deg(self.right_ascension),
            sin_deg(self.declination),
        )
    }

    fn from_unit_vector(vector: &Vector3<f64>) -> Self {
        let v = vector.normalize();
        Self::new(asin_deg(v.z), atan2_deg(v.y, v.x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_values_are_wrapped() {
        let eq = EquatorialCoordinate::new(95.0, -15.0);
        assert_eq!(eq.declination, 90.0);
        assert_eq!(eq.right_ascension, 345.0);
        assert!(!eq.is_apparent);
        assert!(EquatorialCoordinate::apparent(0.0, 0.0).is_apparent);
    }

    #[test]
    fn test_to_ecliptic() {
        // Pollux, Meeus example 13.a
        let pollux = EquatorialCoordinate::new(28.026183, 116.328942);
        let ecliptic = pollux.to_ecliptic_with_obliquity(23.4392911);
        assert_abs_diff_eq!(ecliptic.longitude, 113.215630, epsilon = 1e-5);
        assert_abs_diff_eq!(ecliptic.latitude, 6.684170, epsilon = 1e-5);
    }

    #[test]
    fn test_hour_angle() {
        let eq = EquatorialCoordinate::new(10.0, 90.0);
        let sidereal = SiderealTime::new(2.0, 0.0);
        assert_abs_diff_eq!(eq.hour_angle(&sidereal), 20.0, epsilon = 1e-12);

        let rebuilt = EquatorialCoordinate::from_hour_angle(10.0, 20.0, &sidereal);
        assert_abs_diff_eq!(rebuilt.right_ascension, 90.0, epsilon = 1e-9);
    }
}
