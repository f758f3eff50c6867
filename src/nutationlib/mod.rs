//! Obliquity of the ecliptic and nutation
//!
//! All functions take Julian centuries since J2000.0 and return degrees.

use crate::coordinates::angle::{cos_deg, polynomial, sin_deg};

/// Obliquity of the ecliptic from the short IAU polynomial
///
/// Good to about a second of arc over several centuries around J2000.0; this
/// is the obliquity used for the ecliptic/equatorial frame conversions.
pub fn simple_obliquity(t: f64) -> f64 {
    23.439292 - polynomial(t, &[0.0, 46.815, 0.0006, -0.00181]) / 3600.0
}

/// Mean obliquity of the ecliptic (Laskar, valid over 10,000 years)
pub fn mean_obliquity(t: f64) -> f64 {
    let u = t / 100.0;
    polynomial(
        u,
        &[
            84381.448, -4680.93, -1.55, 1999.25, -51.38, -249.67, -39.05, 7.12, 27.87, 5.79, 2.45,
        ],
    ) / 3600.0
}

/// True obliquity: the mean obliquity plus nutation in obliquity
pub fn true_obliquity(t: f64) -> f64 {
    mean_obliquity(t) + nutation_in_obliquity(t)
}

/// Nutation in longitude (delta psi)
pub fn nutation_in_longitude(t: f64) -> f64 {
    let arguments = fundamental_arguments(t);
    NUTATION_TERMS
        .iter()
        .map(|row| (row[5] + row[6] * t) * sin_deg(term_argument(row, &arguments)))
        .sum::<f64>()
        / 36_000_000.0
}

/// Nutation in obliquity (delta epsilon)
pub fn nutation_in_obliquity(t: f64) -> f64 {
    let arguments = fundamental_arguments(t);
    NUTATION_TERMS
        .iter()
        .map(|row| (row[7] + row[8] * t) * cos_deg(term_argument(row, &arguments)))
        .sum::<f64>()
        / 36_000_000.0
}

/// Mean elongation of the Moon, mean anomalies of the Sun and Moon, the Moon's
/// argument of latitude and the longitude of its ascending node
fn fundamental_arguments(t: f64) -> [f64; 5] {
    [
        polynomial(t, &[297.85036, 445_267.111480, -0.0019142, 1.0 / 189_474.0]),
        polynomial(t, &[357.52772, 35_999.050340, -0.0001603, -1.0 / 300_000.0]),
        polynomial(t, &[134.96298, 477_198.867398, 0.0086972, 1.0 / 56_250.0]),
        polynomial(t, &[93.27191, 483_202.017538, -0.0036825, 1.0 / 327_270.0]),
        polynomial(t, &[125.04452, -1934.136261, 0.0020708, 1.0 / 450_000.0]),
    ]
}

fn term_argument(row: &[f64; 9], arguments: &[f64; 5]) -> f64 {
    row[..5]
        .iter()
        .zip(arguments.iter())
        .map(|(multiple, argument)| multiple * argument)
        .sum()
}

/// Periodic terms of nutation in units of 0.0001".
///
/// Columns: multiples of D, M, M', F, Omega; longitude coefficient and its
/// rate per century; obliquity coefficient and its rate per century.
#[rustfmt::skip]
const NUTATION_TERMS: [[f64; 9]; 63] = [
    [0.0, 0.0, 0.0, 0.0, 1.0, -171996.0, -174.2, 92025.0, 8.9],
    [-2.0, 0.0, 0.0, 2.0, 2.0, -13187.0, -1.6, 5736.0, -3.1],
    [0.0, 0.0, 0.0, 2.0, 2.0, -2274.0, -0.2, 977.0, -0.5],
    [0.0, 0.0, 0.0, 0.0, 2.0, 2062.0, 0.2, -895.0, 0.5],
    [0.0, 1.0, 0.0, 0.0, 0.0, 1426.0, -3.4, 54.0, -0.1],
    [0.0, 0.0, 1.0, 0.0, 0.0, 712.0, 0.1, -7.0, 0.0],
    [-2.0, 1.0, 0.0, 2.0, 2.0, -517.0, 1.2, 224.0, -0.6],
    [0.0, 0.0, 0.0, 2.0, 1.0, -386.0, -0.4, 200.0, 0.0],
    [0.0, 0.0, 1.0, 2.0, 2.0, -301.0, 0.0, 129.0, -0.1],
    [-2.0, -1.0, 0.0, 2.0, 2.0, 217.0, -0.5, -95.0, 0.3],
    [-2.0, 0.0, 1.0, 0.0, 0.0, -158.0, 0.0, 0.0, 0.0],
    [-2.0, 0.0, 0.0, 2.0, 1.0, 129.0, 0.1, -70.0, 0.0],
    [0.0, 0.0, -1.0, 2.0, 2.0, 123.0, 0.0, -53.0, 0.0],
    [2.0, 0.0, 0.0, 0.0, 0.0, 63.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0, 1.0, 63.0, 0.1, -33.0, 0.0],
    [2.0, 0.0, -1.0, 2.0, 2.0, -59.0, 0.0, 26.0, 0.0],
    [0.0, 0.0, -1.0, 0.0, 1.0, -58.0, -0.1, 32.0, 0.0],
    [0.0, 0.0, 1.0, 2.0, 1.0, -51.0, 0.0, 27.0, 0.0],
    [-2.0, 0.0, 2.0, 0.0, 0.0, 48.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, -2.0, 2.0, 1.0, 46.0, 0.0, -24.0, 0.0],
    [2.0, 0.0, 0.0, 2.0, 2.0, -38.0, 0.0, 16.0, 0.0],
    [0.0, 0.0, 2.0, 2.0, 2.0, -31.0, 0.0, 13.0, 0.0],
    [0.0, 0.0, 2.0, 0.0, 0.0, 29.0, 0.0, 0.0, 0.0],
    [-2.0, 0.0, 1.0, 2.0, 2.0, 29.0, 0.0, -12.0, 0.0],
    [0.0, 0.0, 0.0, 2.0, 0.0, 26.0, 0.0, 0.0, 0.0],
    [-2.0, 0.0, 0.0, 2.0, 0.0, -22.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, -1.0, 2.0, 1.0, 21.0, 0.0, -10.0, 0.0],
    [0.0, 2.0, 0.0, 0.0, 0.0, 17.0, -0.1, 0.0, 0.0],
    [2.0, 0.0, -1.0, 0.0, 1.0, 16.0, 0.0, -8.0, 0.0],
    [-2.0, 2.0, 0.0, 2.0, 2.0, -16.0, 0.1, 7.0, 0.0],
    [0.0, 1.0, 0.0, 0.0, 1.0, -15.0, 0.0, 9.0, 0.0],
    [-2.0, 0.0, 1.0, 0.0, 1.0, -13.0, 0.0, 7.0, 0.0],
    [0.0, -1.0, 0.0, 0.0, 1.0, -12.0, 0.0, 6.0, 0.0],
    [0.0, 0.0, 2.0, -2.0, 0.0, 11.0, 0.0, 0.0, 0.0],
    [2.0, 0.0, -1.0, 2.0, 1.0, -10.0, 0.0, 5.0, 0.0],
    [2.0, 0.0, 1.0, 2.0, 2.0, -8.0, 0.0, 3.0, 0.0],
    [0.0, 1.0, 0.0, 2.0, 2.0, 7.0, 0.0, -3.0, 0.0],
    [-2.0, 1.0, 1.0, 0.0, 0.0, -7.0, 0.0, 0.0, 0.0],
    [0.0, -1.0, 0.0, 2.0, 2.0, -7.0, 0.0, 3.0, 0.0],
    [2.0, 0.0, 0.0, 2.0, 1.0, -7.0, 0.0, 3.0, 0.0],
    [2.0, 0.0, 1.0, 0.0, 0.0, 6.0, 0.0, 0.0, 0.0],
    [-2.0, 0.0, 2.0, 2.0, 2.0, 6.0, 0.0, -3.0, 0.0],
    [-2.0, 0.0, 1.0, 2.0, 1.0, 6.0, 0.0, -3.0, 0.0],
    [2.0, 0.0, -2.0, 0.0, 1.0, -6.0, 0.0, 3.0, 0.0],
    [2.0, 0.0, 0.0, 0.0, 1.0, -6.0, 0.0, 3.0, 0.0],
    [0.0, -1.0, 1.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0],
    [-2.0, -1.0, 0.0, 2.0, 1.0, -5.0, 0.0, 3.0, 0.0],
    [-2.0, 0.0, 0.0, 0.0, 1.0, -5.0, 0.0, 3.0, 0.0],
    [0.0, 0.0, 2.0, 2.0, 1.0, -5.0, 0.0, 3.0, 0.0],
    [-2.0, 0.0, 2.0, 0.0, 1.0, 4.0, 0.0, 0.0, 0.0],
    [-2.0, 1.0, 0.0, 2.0, 1.0, 4.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, -2.0, 0.0, 4.0, 0.0, 0.0, 0.0],
    [-1.0, 0.0, 1.0, 0.0, 0.0, -4.0, 0.0, 0.0, 0.0],
    [-2.0, 1.0, 0.0, 0.0, 0.0, -4.0, 0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0, 0.0, 0.0, -4.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 2.0, 0.0, 3.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, -2.0, 2.0, 2.0, -3.0, 0.0, 0.0, 0.0],
    [-1.0, -1.0, 1.0, 0.0, 0.0, -3.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 1.0, 0.0, 0.0, -3.0, 0.0, 0.0, 0.0],
    [0.0, -1.0, 1.0, 2.0, 2.0, -3.0, 0.0, 0.0, 0.0],
    [2.0, -1.0, -1.0, 2.0, 2.0, -3.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 3.0, 2.0, 2.0, -3.0, 0.0, 0.0, 0.0],
    [2.0, -1.0, 0.0, 2.0, 2.0, -3.0, 0.0, 0.0, 0.0],
];

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // 1987 April 10, 0h TD
    const T: f64 = -0.127_296_372_348;

    #[test]
    fn test_nutation() {
        assert_abs_diff_eq!(nutation_in_longitude(T) * 3600.0, -3.788, epsilon = 0.01);
        assert_abs_diff_eq!(nutation_in_obliquity(T) * 3600.0, 9.443, epsilon = 0.01);
    }

    #[test]
    fn test_obliquity() {
        // 23°26'27.407"
        assert_abs_diff_eq!(mean_obliquity(T), 23.440_946, epsilon = 1e-5);
        // 23°26'36.850"
        assert_abs_diff_eq!(true_obliquity(T), 23.443_569, epsilon = 1e-5);
        assert_abs_diff_eq!(simple_obliquity(T), 23.440_946, epsilon = 1e-4);
        assert_abs_diff_eq!(simple_obliquity(0.0), 23.439_292, epsilon = 1e-9);
    }
}
