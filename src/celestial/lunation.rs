//! Instants of the lunar phases (Meeus ch. 49)
//!
//! A lunation number `k` counts new moons from 2000 January 6. Its
//! fractional part selects the phase: .0 new, .25 first quarter, .5 full,
//! .75 last quarter. Other fractions give the mean phase only.

use crate::coordinates::angle::{cos_deg, normalize_degrees, polynomial, sin_deg};
use crate::constants::SYNODIC_MONTH;

/// Arguments of the lunation `k` in degrees (Meeus 49.4 - 49.7)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunationArguments {
    /// Julian centuries since J2000.0 of the lunation
    pub t: f64,
    /// Eccentricity factor of Earth's orbit
    pub e: f64,
    /// Sun's mean anomaly
    pub m: f64,
    /// Moon's mean anomaly
    pub m_prime: f64,
    /// Moon's argument of latitude
    pub f: f64,
    /// Longitude of the ascending node of the lunar orbit
    pub omega: f64,
}

impl LunationArguments {
    pub fn new(k: f64) -> Self {
        let t = k / 1236.85;
        Self {
            t,
            e: polynomial(t, &[1.0, -0.002516, -0.0000074]),
            m: normalize_degrees(2.5534 + 29.105_356_7 * k + polynomial(t, &[0.0, 0.0, -0.0000014, -0.00000011])),
            m_prime: normalize_degrees(
                201.5643
                    + 385.816_935_28 * k
                    + polynomial(t, &[0.0, 0.0, 0.0107582, 0.00001238, -0.000000058]),
            ),
            f: normalize_degrees(
                160.7108
                    + 390.670_502_84 * k
                    + polynomial(t, &[0.0, 0.0, -0.0016118, -0.00000227, 0.000000011]),
            ),
            omega: normalize_degrees(
                124.7746 - 1.563_755_88 * k + polynomial(t, &[0.0, 0.0, 0.0020672, 0.00000215]),
            ),
        }
    }
}

/// Julian Ephemeris Day of the mean phase `k` (Meeus 49.1)
pub fn mean_phase(k: f64) -> f64 {
    let t = k / 1236.85;
    2_451_550.09766
        + SYNODIC_MONTH * k
        + polynomial(t, &[0.0, 0.0, 0.00015437, -0.00000015, 0.00000000074])
}

/// Julian Ephemeris Day of the true phase `k`
///
/// New, quarter and full moons (`k` a whole number plus 0, 0.25, 0.5 or
/// 0.75) get the periodic corrections of Meeus ch. 49, leaving an error of
/// well under a minute. The planetary arguments are omitted. Any other
/// fraction gets the mean phase.
pub fn true_phase(k: f64) -> f64 {
    let quarters = (k - k.floor()) * 4.0;
    let principal = quarters.round();
    if (quarters - principal).abs() > 1e-9 {
        return mean_phase(k);
    }

    let a = LunationArguments::new(k);
    let correction = match principal as u8 {
        0 | 4 => new_moon_correction(&a),
        2 => full_moon_correction(&a),
        1 => quarter_correction(&a) + quarter_adjustment(&a),
        _ => quarter_correction(&a) - quarter_adjustment(&a),
    };
    mean_phase(k) + correction
}

fn new_moon_correction(a: &LunationArguments) -> f64 {
    let (e, m, mp, f, om) = (a.e, a.m, a.m_prime, a.f, a.omega);
    -0.40720 * sin_deg(mp) + 0.17241 * e * sin_deg(m) + 0.01608 * sin_deg(2.0 * mp)
        + 0.01039 * sin_deg(2.0 * f)
        + 0.00739 * e * sin_deg(mp - m)
        - 0.00514 * e * sin_deg(mp + m)
        + 0.00208 * e * e * sin_deg(2.0 * m)
        - 0.00111 * sin_deg(mp - 2.0 * f)
        - 0.00057 * sin_deg(mp + 2.0 * f)
        + 0.00056 * e * sin_deg(2.0 * mp + m)
        - 0.00042 * sin_deg(3.0 * mp)
        + 0.00042 * e * sin_deg(m + 2.0 * f)
        + 0.00038 * e * sin_deg(m - 2.0 * f)
        - 0.00024 * e * sin_deg(2.0 * mp - m)
        - 0.00017 * sin_deg(om)
        - 0.00007 * sin_deg(mp + 2.0 * m)
}

fn full_moon_correction(a: &LunationArguments) -> f64 {
    let (e, m, mp, f, om) = (a.e, a.m, a.m_prime, a.f, a.omega);
    -0.40614 * sin_deg(mp) + 0.17302 * e * sin_deg(m) + 0.01614 * sin_deg(2.0 * mp)
        + 0.01043 * sin_deg(2.0 * f)
        + 0.00734 * e * sin_deg(mp - m)
        - 0.00515 * e * sin_deg(mp + m)
        + 0.00209 * e * e * sin_deg(2.0 * m)
        - 0.00111 * sin_deg(mp - 2.0 * f)
        - 0.00057 * sin_deg(mp + 2.0 * f)
        + 0.00056 * e * sin_deg(2.0 * mp + m)
        - 0.00042 * sin_deg(3.0 * mp)
        + 0.00042 * e * sin_deg(m + 2.0 * f)
        + 0.00038 * e * sin_deg(m - 2.0 * f)
        - 0.00024 * e * sin_deg(2.0 * mp - m)
        - 0.00017 * sin_deg(om)
        - 0.00007 * sin_deg(mp + 2.0 * m)
}

fn quarter_correction(a: &LunationArguments) -> f64 {
    let (e, m, mp, f, om) = (a.e, a.m, a.m_prime, a.f, a.omega);
    -0.62801 * sin_deg(mp) + 0.17172 * e * sin_deg(m) - 0.01183 * e * sin_deg(mp + m)
        + 0.00862 * sin_deg(2.0 * mp)
        + 0.00804 * sin_deg(2.0 * f)
        + 0.00454 * e * sin_deg(mp - m)
        + 0.00204 * e * e * sin_deg(2.0 * m)
        - 0.00180 * sin_deg(mp - 2.0 * f)
        - 0.00070 * sin_deg(mp + 2.0 * f)
        - 0.00040 * sin_deg(3.0 * mp)
        - 0.00034 * e * sin_deg(2.0 * mp - m)
        + 0.00032 * e * sin_deg(m + 2.0 * f)
        + 0.00032 * e * sin_deg(m - 2.0 * f)
        - 0.00028 * e * e * sin_deg(mp + 2.0 * m)
        + 0.00027 * e * sin_deg(2.0 * mp + m)
        - 0.00017 * sin_deg(om)
}

/// Added at first quarter, subtracted at last quarter
fn quarter_adjustment(a: &LunationArguments) -> f64 {
    let (e, m, mp, f) = (a.e, a.m, a.m_prime, a.f);
    0.00306 - 0.00038 * e * cos_deg(m) + 0.00026 * cos_deg(mp) - 0.00002 * cos_deg(mp - m)
        + 0.00002 * cos_deg(mp + m)
        + 0.00002 * cos_deg(2.0 * f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_new_moon_1977() {
        // Meeus example 49.a: new moon of 1977 February
        let k = -283.0;
        assert_abs_diff_eq!(mean_phase(k), 2_443_192.94102, epsilon = 1e-4);
        assert_abs_diff_eq!(true_phase(k), 2_443_192.65118, epsilon = 1e-3);
    }

    #[test]
    fn test_last_quarter_2044() {
        // Meeus example 49.b: first last quarter of 2044 January
        assert_abs_diff_eq!(true_phase(544.75), 2_467_636.49186, epsilon = 1e-3);
    }

    #[test]
    fn test_only_principal_phases_are_corrected() {
        for k in [12.1, 12.3, 12.6, -40.9] {
            assert_eq!(true_phase(k), mean_phase(k));
        }
        for k in [12.0, 12.25, 12.5, 12.75, -40.25] {
            assert!((true_phase(k) - mean_phase(k)).abs() > 1e-6);
        }
    }

    #[test]
    fn test_arguments_are_normalized() {
        let a = LunationArguments::new(250.5);
        for angle in [a.m, a.m_prime, a.f, a.omega] {
            assert!((0.0..360.0).contains(&angle));
        }
        assert!(a.e < 1.0);
    }
}
