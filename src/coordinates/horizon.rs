use super::angle::{
    acos_deg, asin_deg, atan2_deg, atan_deg, clamp_latitude, cos_deg, normalize_degrees,
    polynomial, sin_deg, tan_deg,
};
use super::{EquatorialCoordinate, SphericalFrame};
use crate::constants::{EARTH_AXIS_RATIO, EARTH_RADIUS_KM};
use crate::time::SiderealTime;
use crate::units::Distance;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A position relative to an observer's horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonCoordinate {
    /// Azimuth in degrees east of north, [0, 360)
    pub azimuth: f64,
    /// Altitude above the horizon in degrees, [-90, 90]
    pub altitude: f64,
}

impl HorizonCoordinate {
    pub fn new(azimuth: f64, altitude: f64) -> Self {
        Self {
            azimuth: normalize_degrees(azimuth),
            altitude: clamp_latitude(altitude),
        }
    }

    /// Angular distance from the zenith
    pub fn zenith(&self) -> f64 {
        90.0 - self.altitude
    }

    /// Geometric horizon coordinate of an equatorial position
    ///
    /// `sidereal` must be the local sidereal time at the observer's longitude.
    pub fn from_equatorial(
        equatorial: &EquatorialCoordinate,
        sidereal: &SiderealTime,
        latitude: f64,
    ) -> Self {
        let hour_angle = equatorial.hour_angle(sidereal) * 15.0;
        let sin_dec = sin_deg(equatorial.declination);
        let sin_lat = sin_deg(latitude);
        let cos_lat = cos_deg(latitude);

        let altitude = asin_deg(
            sin_dec * sin_lat + cos_deg(equatorial.declination) * cos_lat * cos_deg(hour_angle),
        );

        let mut azimuth =
            acos_deg((sin_dec - sin_lat * sin_deg(altitude)) / (cos_lat * cos_deg(altitude)));
        if sin_deg(hour_angle) > 0.0 {
            azimuth = 360.0 - azimuth;
        }

        Self::new(azimuth, altitude)
    }

    /// Topocentric horizon coordinate, shifting the body for the observer's
    /// offset from Earth's center (Meeus ch. 40, sea level)
    pub fn from_equatorial_with_parallax(
        equatorial: &EquatorialCoordinate,
        sidereal: &SiderealTime,
        latitude: f64,
        distance: Distance,
    ) -> Self {
        let sin_parallax = EARTH_RADIUS_KM / distance.kilometers();
        let hour_angle = equatorial.hour_angle(sidereal) * 15.0;

        let u = atan_deg(EARTH_AXIS_RATIO * tan_deg(latitude));
        let rho_cos = cos_deg(u);
        let rho_sin = EARTH_AXIS_RATIO * sin_deg(u);

        let cos_dec = cos_deg(equatorial.declination);
        let denominator = cos_dec - rho_cos * sin_parallax * cos_deg(hour_angle);

        let delta_ra = atan2_deg(
            -rho_cos * sin_parallax * sin_deg(hour_angle),
            denominator,
        );
        let declination = atan2_deg(
            (sin_deg(equatorial.declination) - rho_sin * sin_parallax) * cos_deg(delta_ra),
            denominator,
        );

        let topocentric = EquatorialCoordinate {
            is_apparent: equatorial.is_apparent,
            ..EquatorialCoordinate::new(declination, equatorial.right_ascension + delta_ra)
        };
        Self::from_equatorial(&topocentric, sidereal, latitude)
    }

    /// Inverse of [`HorizonCoordinate::from_equatorial`]
    pub fn to_equatorial(&self, sidereal: &SiderealTime, latitude: f64) -> EquatorialCoordinate {
        let sin_alt = sin_deg(self.altitude);
        let sin_lat = sin_deg(latitude);
        let cos_lat = cos_deg(latitude);

        let declination =
            asin_deg(sin_alt * sin_lat + cos_deg(self.altitude) * cos_lat * cos_deg(self.azimuth));

        let mut hour_angle = acos_deg(
            (sin_alt - sin_lat * sin_deg(declination)) / (cos_lat * cos_deg(declination)),
        );
        if sin_deg(self.azimuth) > 0.0 {
            hour_angle = 360.0 - hour_angle;
        }

        EquatorialCoordinate::from_hour_angle(declination, hour_angle / 15.0, sidereal)
    }

    /// The apparent position after atmospheric refraction; azimuth is unchanged
    pub fn with_refraction(&self) -> Self {
        Self::new(self.azimuth, self.altitude + refraction(self.altitude))
    }

    /// Great-circle separation in degrees
    pub fn angular_distance_to(&self, other: &HorizonCoordinate) -> f64 {
        self.angle_between(other)
    }
}

impl SphericalFrame for HorizonCoordinate {
    fn to_unit_vector(&self) -> Vector3<f64> {
        let cos_alt = cos_deg(self.altitude);
        Vector3::new(
            cos_alt * cos_deg(self.azimuth),
            cos_alt * sin_deg(self.azimuth),
            sin_deg(self.altitude),
        )
    }

    fn from_unit_vector(vector: &Vector3<f64>) -> Self {
        let v = vector.normalize();
        Self::new(atan2_deg(v.y, v.x), asin_deg(v.z))
    }
}

/// Atmospheric refraction in degrees for a geometric altitude
///
/// Piecewise approximation for standard pressure and temperature.
pub fn refraction(altitude: f64) -> f64 {
    if altitude > 85.0 {
        return 0.0;
    }

    let tan_alt = tan_deg(altitude);

    let arcseconds = if altitude > 5.0 {
        58.1 / tan_alt - 0.07 / tan_alt.powi(3) + 0.000086 / tan_alt.powi(5)
    } else if altitude > -0.575 {
        polynomial(altitude, &[1735.0, -518.2, 103.4, -12.79, 0.711])
    } else {
        -20.774 / tan_alt
    };

    arcseconds / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_from_equatorial() {
        // HA 5h51m44s, dec 23°13'10" at 52°N -> alt 19°20'04", az 283°16'16"
        let sidereal = SiderealTime::new(5.862222, 0.0);
        let eq = EquatorialCoordinate::new(23.219444, 0.0);
        let horizon = HorizonCoordinate::from_equatorial(&eq, &sidereal, 52.0);
        assert_abs_diff_eq!(horizon.altitude, 19.334345, epsilon = 1e-4);
        assert_abs_diff_eq!(horizon.azimuth, 283.271027, epsilon = 1e-4);
    }

    #[test]
    fn test_round_trip() {
        let sidereal = SiderealTime::new(17.25, -74.0);
        for (dec, ra) in [(10.0, 20.0), (-40.0, 300.0), (75.0, 181.0), (0.0, 259.0)] {
            let eq = EquatorialCoordinate::new(dec, ra);
            for latitude in [-60.0, 0.5, 40.7] {
                let horizon = HorizonCoordinate::from_equatorial(&eq, &sidereal, latitude);
                let back = horizon.to_equatorial(&sidereal, latitude);
                assert_abs_diff_eq!(back.declination, dec, epsilon = 1e-6);
                assert_abs_diff_eq!(back.right_ascension, ra, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_refraction() {
        assert_eq!(refraction(86.0), 0.0);
        // About 34 arcminutes at the horizon
        assert_abs_diff_eq!(refraction(0.0), 1735.0 / 3600.0, epsilon = 1e-12);
        assert_abs_diff_eq!(refraction(10.0) * 60.0, 5.3, epsilon = 0.1);
        assert!(refraction(-2.0) > 0.0);

        let horizon = HorizonCoordinate::new(123.0, 10.0).with_refraction();
        assert_eq!(horizon.azimuth, 123.0);
        assert!(horizon.altitude > 10.0);
    }

    #[test]
    fn test_parallax_lowers_the_moon() {
        let sidereal = SiderealTime::new(3.0, 0.0);
        let eq = EquatorialCoordinate::new(15.0, 30.0);
        let geocentric = HorizonCoordinate::from_equatorial(&eq, &sidereal, 45.0);
        let topocentric = HorizonCoordinate::from_equatorial_with_parallax(
            &eq,
            &sidereal,
            45.0,
            Distance::from_kilometers(384_400.0),
        );
        let drop = geocentric.altitude - topocentric.altitude;
        // Horizontal parallax is about 0.95 degrees, scaled by cos(altitude)
        assert!(drop > 0.0 && drop < 0.96);
        assert_abs_diff_eq!(drop, 0.9507 * cos_deg(geocentric.altitude), epsilon = 0.02);
    }

    #[test]
    fn test_angular_distance() {
        let a = HorizonCoordinate::new(0.0, 0.0);
        let b = HorizonCoordinate::new(90.0, 0.0);
        let zenith = HorizonCoordinate::new(200.0, 90.0);
        assert_abs_diff_eq!(a.angular_distance_to(&b), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a.angular_distance_to(&zenith), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(zenith.zenith(), 0.0, epsilon = 1e-12);
    }
}
