//! # Angle Helpers
//!
//! Every angle in this crate is carried as an `f64` in decimal degrees. This
//! module collects the degree-based trigonometry and range wrapping that the
//! rest of the crate is built on.
//!
//! ## Range Conventions
//!
//! - Right ascension, ecliptic longitude and azimuth live in `[0, 360)`
//! - Declination, latitude and altitude live in `[-90, 90]`
//! - Sidereal time lives in `[0, 24)` hours
//!
//! ## Domain Safety
//!
//! The inverse functions [`asin_deg`] and [`acos_deg`] clamp their argument to
//! `[-1, 1]` first, so rounding noise such as `1.0000000000000002` can never
//! produce `NaN`.
//!
//! ## Examples
//!
//! ```rust
//! use skycalc::coordinates::angle::{normalize_degrees, polynomial, wrap};
//!
//! assert_eq!(normalize_degrees(370.0), 10.0);
//! assert_eq!(normalize_degrees(-30.0), 330.0);
//! assert_eq!(wrap(25.0, 0.0, 24.0), 1.0);
//!
//! // 1 + 2x + 3x^2 at x = 2
//! assert_eq!(polynomial(2.0, &[1.0, 2.0, 3.0]), 17.0);
//! ```

use crate::constants::{DEG2RAD, RAD2DEG};

/// Wraps `value` into the half-open range `[min, max)`
///
/// Values that are already inside the range are returned unchanged, so
/// wrapping is idempotent.
///
/// # Examples
///
/// ```rust
/// use skycalc::coordinates::angle::wrap;
///
/// assert_eq!(wrap(-1.0, 0.0, 24.0), 23.0);
/// assert_eq!(wrap(720.5, 0.0, 360.0), 0.5);
/// ```
pub fn wrap(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if value >= min && value < max {
        return value;
    }
    let wrapped = (value - min).rem_euclid(range) + min;
    // rem_euclid can round up to exactly `range` for tiny negative inputs
    if wrapped >= max {
        min
    } else {
        wrapped
    }
}

/// Normalizes an angle into `[0, 360)` degrees
pub fn normalize_degrees(degrees: f64) -> f64 {
    wrap(degrees, 0.0, 360.0)
}

/// Clamps a latitude-like angle into `[-90, 90]` degrees
pub fn clamp_latitude(degrees: f64) -> f64 {
    degrees.clamp(-90.0, 90.0)
}

/// Signed smallest difference `to - from` in degrees, in `(-180, 180]`
///
/// # Examples
///
/// ```rust
/// use skycalc::coordinates::angle::delta_angle;
///
/// assert_eq!(delta_angle(350.0, 10.0), 20.0);
/// assert_eq!(delta_angle(10.0, 350.0), -20.0);
/// ```
pub fn delta_angle(from: f64, to: f64) -> f64 {
    let delta = normalize_degrees(to - from);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Evaluates `coefs[0] + coefs[1] x + coefs[2] x^2 + ...` with Horner's method
pub fn polynomial(x: f64, coefs: &[f64]) -> f64 {
    coefs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Sine of an angle in degrees
pub fn sin_deg(degrees: f64) -> f64 {
    (degrees * DEG2RAD).sin()
}

/// Cosine of an angle in degrees
pub fn cos_deg(degrees: f64) -> f64 {
    (degrees * DEG2RAD).cos()
}

/// Tangent of an angle in degrees
pub fn tan_deg(degrees: f64) -> f64 {
    (degrees * DEG2RAD).tan()
}

/// Arcsine in degrees with the argument clamped to `[-1, 1]`
pub fn asin_deg(value: f64) -> f64 {
    value.clamp(-1.0, 1.0).asin() * RAD2DEG
}

/// Arccosine in degrees with the argument clamped to `[-1, 1]`
pub fn acos_deg(value: f64) -> f64 {
    value.clamp(-1.0, 1.0).acos() * RAD2DEG
}

/// Arctangent in degrees
pub fn atan_deg(value: f64) -> f64 {
    value.atan() * RAD2DEG
}

/// Four-quadrant arctangent in degrees, in `(-180, 180]`
pub fn atan2_deg(y: f64, x: f64) -> f64 {
    y.atan2(x) * RAD2DEG
}

/// Converts an hours-minutes-seconds time angle into degrees
///
/// # Examples
///
/// ```rust
/// use skycalc::coordinates::angle::hms_to_degrees;
///
/// assert_eq!(hms_to_degrees(1.0, 0.0, 0.0), 15.0);
/// assert_eq!(hms_to_degrees(0.0, 30.0, 0.0), 7.5);
/// ```
pub fn hms_to_degrees(hours: f64, minutes: f64, seconds: f64) -> f64 {
    (hours + minutes / 60.0 + seconds / 3600.0) * 15.0
}

/// Converts a degrees-arcminutes-arcseconds angle into decimal degrees
///
/// The sign of `degrees` applies to the whole angle.
pub fn dms_to_degrees(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
    if degrees.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_wrap_ranges() {
        assert_eq!(wrap(360.0, 0.0, 360.0), 0.0);
        assert_eq!(wrap(0.0, 0.0, 360.0), 0.0);
        assert_abs_diff_eq!(wrap(-0.25, 0.0, 24.0), 23.75, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap(-725.0, 0.0, 360.0), 355.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap(1.5, -1.0, 1.0), -0.5, epsilon = 1e-12);

        let tiny = wrap(-1e-18, 0.0, 360.0);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_delta_angle_is_signed_and_short() {
        assert_eq!(delta_angle(0.0, 180.0), 180.0);
        assert_eq!(delta_angle(180.0, 0.0), 180.0);
        assert_abs_diff_eq!(delta_angle(270.0, 90.5), -179.5, epsilon = 1e-12);
        assert_abs_diff_eq!(delta_angle(283.15, 283.0), -0.15, epsilon = 1e-9);
    }

    #[test]
    fn test_polynomial() {
        assert_eq!(polynomial(3.0, &[]), 0.0);
        assert_eq!(polynomial(3.0, &[5.0]), 5.0);
        assert_eq!(polynomial(-1.0, &[1.0, 1.0, 1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_clamped_inverse_functions() {
        assert_eq!(asin_deg(1.0 + 1e-12), 90.0);
        assert_eq!(acos_deg(-1.0 - 1e-12), 180.0);
        assert!(!asin_deg(2.0).is_nan());
        assert_abs_diff_eq!(atan2_deg(1.0, -1.0), 135.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sexagesimal_conversions() {
        assert_abs_diff_eq!(hms_to_degrees(15.0, 20.0, 0.0), 230.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dms_to_degrees(-16.0, 42.0, 58.0), -16.716111, epsilon = 1e-6);
        assert_abs_diff_eq!(dms_to_degrees(-0.0, 30.0, 0.0), -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_degree_trig() {
        assert_abs_diff_eq!(sin_deg(30.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(cos_deg(60.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(tan_deg(45.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(atan_deg(1.0), 45.0, epsilon = 1e-12);
    }
}
