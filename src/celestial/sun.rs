//! Low-precision solar coordinates (Meeus ch. 25)

use super::CelestialObject;
use crate::constants::{AU_KM, SUN_SEMI_DIAMETER_ASEC, SUN_SEMI_MAJOR_AXIS_KM};
use crate::coordinates::angle::{
    asin_deg, atan2_deg, cos_deg, normalize_degrees, polynomial, sin_deg,
};
use crate::coordinates::EquatorialCoordinate;
use crate::nutationlib::mean_obliquity;
use crate::time::UniversalTime;
use crate::units::Distance;

/// The Sun as seen from Earth's center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sun;

impl Sun {
    /// Apparent equatorial coordinate for `t` Julian centuries (TT) since J2000.0
    pub fn coordinates_at(&self, t: f64) -> EquatorialCoordinate {
        let longitude = apparent_longitude(t);
        let obliquity = corrected_obliquity(t);
        let right_ascension = atan2_deg(
            cos_deg(obliquity) * sin_deg(longitude),
            cos_deg(longitude),
        );
        let declination = asin_deg(sin_deg(obliquity) * sin_deg(longitude));
        EquatorialCoordinate::apparent(declination, right_ascension)
    }

    /// Earth-Sun distance for `t` Julian centuries (TT) since J2000.0
    pub fn distance_at(&self, t: f64) -> Distance {
        let e = eccentricity(t);
        let factor = (1.0 + e * cos_deg(true_anomaly(t))) / (1.0 - e * e);
        Distance::from_kilometers(SUN_SEMI_MAJOR_AXIS_KM / factor)
    }

    /// Mean anomaly in degrees
    pub fn mean_anomaly(&self, t: f64) -> f64 {
        mean_anomaly(t)
    }

    /// Apparent geocentric ecliptic longitude in degrees
    pub fn apparent_longitude(&self, t: f64) -> f64 {
        normalize_degrees(apparent_longitude(t))
    }

    /// Apparent angular diameter in degrees
    pub fn angular_diameter(&self, ut: &UniversalTime) -> f64 {
        let au = self.distance_at(ut.terrestrial_centuries()).kilometers() / AU_KM;
        2.0 * SUN_SEMI_DIAMETER_ASEC / (3600.0 * au)
    }
}

impl CelestialObject for Sun {
    fn position_at(&self, ut: &UniversalTime) -> EquatorialCoordinate {
        self.coordinates_at(ut.terrestrial_centuries())
    }

    fn distance_at(&self, ut: &UniversalTime) -> Option<Distance> {
        Some(Sun::distance_at(self, ut.terrestrial_centuries()))
    }
}

fn mean_anomaly(t: f64) -> f64 {
    normalize_degrees(polynomial(
        t,
        &[357.5291092, 35999.0502909, -0.0001536, 1.0 / 24_490_000.0],
    ))
}

fn geometric_longitude(t: f64) -> f64 {
    normalize_degrees(polynomial(t, &[280.46646, 36000.76983, 0.0003032]))
}

fn eccentricity(t: f64) -> f64 {
    polynomial(t, &[0.01675104, -0.0000418, -0.000000126])
}

fn equation_of_center(t: f64) -> f64 {
    let m = mean_anomaly(t);
    polynomial(t, &[1.914602, -0.004817, -0.000014]) * sin_deg(m)
        + polynomial(t, &[0.019993, -0.000101]) * sin_deg(2.0 * m)
        + 0.000289 * sin_deg(3.0 * m)
}

fn true_anomaly(t: f64) -> f64 {
    normalize_degrees(mean_anomaly(t) + equation_of_center(t))
}

fn omega(t: f64) -> f64 {
    polynomial(t, &[125.04, -1934.136])
}

fn apparent_longitude(t: f64) -> f64 {
    geometric_longitude(t) + equation_of_center(t) - 0.00569 - 0.00478 * sin_deg(omega(t))
}

fn corrected_obliquity(t: f64) -> f64 {
    mean_obliquity(t) + 0.00256 * cos_deg(omega(t))
}
