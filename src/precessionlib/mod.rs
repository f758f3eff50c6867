//! Precession of catalog coordinates
//!
//! Rigorous precession from the J2000.0 equinox to the equinox of date
//! (Meeus ch. 21), with optional linear proper motion.

use crate::coordinates::angle::{acos_deg, asin_deg, atan2_deg, cos_deg, polynomial, sin_deg};
use crate::coordinates::EquatorialCoordinate;

/// Annual proper motion in degrees per year
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProperMotion {
    pub declination: f64,
    pub right_ascension: f64,
}

impl ProperMotion {
    /// From catalog values in milliarcseconds per year
    ///
    /// `pm_ra_cos_dec` is the catalog right ascension rate, already scaled by
    /// cos(declination).
    pub fn from_milliarcseconds(pm_ra_cos_dec: f64, pm_dec: f64, declination: f64) -> Self {
        let cos_dec = cos_deg(declination);
        let ra_rate = if cos_dec.abs() < 1e-9 {
            0.0
        } else {
            pm_ra_cos_dec / cos_dec
        };
        Self {
            declination: pm_dec / 3_600_000.0,
            right_ascension: ra_rate / 3_600_000.0,
        }
    }
}

/// Precess a J2000.0 coordinate to the mean equinox of date
///
/// `t` is Julian centuries since J2000.0.
pub fn precess_from_j2000(
    coordinate: &EquatorialCoordinate,
    motion: &ProperMotion,
    t: f64,
) -> EquatorialCoordinate {
    let zeta = polynomial(t, &[0.0, 2306.2181, 0.30188, 0.017998]) / 3600.0;
    let z = polynomial(t, &[0.0, 2306.2181, 1.09468, 0.018203]) / 3600.0;
    let theta = polynomial(t, &[0.0, 2004.3109, -0.42665, -0.041833]) / 3600.0;

    let years = t * 100.0;
    let declination = coordinate.declination + motion.declination * years;
    let right_ascension = coordinate.right_ascension + motion.right_ascension * years;

    let a = cos_deg(declination) * sin_deg(right_ascension + zeta);
    let b = cos_deg(theta) * cos_deg(declination) * cos_deg(right_ascension + zeta)
        - sin_deg(theta) * sin_deg(declination);
    let c = sin_deg(theta) * cos_deg(declination) * cos_deg(right_ascension + zeta)
        + cos_deg(theta) * sin_deg(declination);

    let precessed_ra = atan2_deg(a, b) + z;
    // Near the poles asin loses precision
    let precessed_dec = if declination.abs() > 89.0 {
        acos_deg(a.hypot(b)).copysign(declination)
    } else {
        asin_deg(c)
    };

    EquatorialCoordinate::new(precessed_dec, precessed_ra)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_precession_theta_persei() {
        // Meeus example 21.b: theta Persei to 2028 November 13.19 TD
        let star = EquatorialCoordinate::new(49.228467, 41.049942);
        let motion = ProperMotion {
            right_ascension: 0.03425 * 15.0 / 3600.0,
            declination: -0.0895 / 3600.0,
        };
        let t = 0.288_670_500_8;
        let result = precess_from_j2000(&star, &motion, t);
        assert_abs_diff_eq!(result.right_ascension, 41.547214, epsilon = 1e-4);
        assert_abs_diff_eq!(result.declination, 49.348483, epsilon = 1e-4);
    }

    #[test]
    fn test_identity_at_epoch() {
        let star = EquatorialCoordinate::new(-16.716116, 101.287155);
        let result = precess_from_j2000(&star, &ProperMotion::default(), 0.0);
        assert_abs_diff_eq!(result.right_ascension, star.right_ascension, epsilon = 1e-9);
        assert_abs_diff_eq!(result.declination, star.declination, epsilon = 1e-9);
    }

    #[test]
    fn test_polar_star() {
        let polaris = EquatorialCoordinate::new(89.264109, 37.954561);
        let result = precess_from_j2000(&polaris, &ProperMotion::default(), 0.2);
        assert!(result.declination > 89.0 && result.declination <= 90.0);
    }
}
