//! Sidereal time
//!
//! Greenwich sidereal time uses the linear approximation anchored at the
//! start of each year. The rise/set solver uses the Meeus mean and apparent
//! sidereal angles instead, which are continuous across years.

use super::UniversalTime;
use crate::constants::{J1900, J2000, JULIAN_CENTURY, SIDEREAL_RATE};
use crate::coordinates::angle::{cos_deg, normalize_degrees, polynomial, wrap};
use crate::nutationlib;
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Sidereal time in hours at a longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiderealTime {
    hours: f64,
    longitude: f64,
}

impl SiderealTime {
    /// Local sidereal time, wrapped to [0, 24) hours
    pub fn new(hours: f64, longitude: f64) -> Self {
        Self {
            hours: wrap(hours, 0.0, 24.0),
            longitude,
        }
    }

    /// Sidereal time on the Greenwich meridian
    pub fn greenwich(hours: f64) -> Self {
        Self::new(hours, 0.0)
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// The sidereal time as an angle in degrees
    pub fn degrees(&self) -> f64 {
        self.hours * 15.0
    }

    /// The same instant expressed as Greenwich sidereal time
    pub fn to_greenwich(&self) -> Self {
        Self::greenwich(self.hours - self.longitude / 15.0)
    }

    /// The same instant expressed as local sidereal time at `longitude`
    pub fn at_longitude(&self, longitude: f64) -> Self {
        let greenwich = self.to_greenwich();
        Self::new(greenwich.hours + longitude / 15.0, longitude)
    }
}

/// Greenwich sidereal time by the year-anchored linear approximation
pub fn greenwich_sidereal_time(ut: &UniversalTime) -> SiderealTime {
    let year = ut.year();
    // Julian Day of January 0.0 of the year
    let jd0 = NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|date| UniversalTime::new(date.and_time(NaiveTime::MIN)).to_julian_day(false) - 1.0)
        .unwrap_or_else(|| ut.to_julian_day(false) - ut.date().ordinal() as f64);
    let days = ut.to_julian_day(false) - jd0;

    let t = (jd0 - J1900) / JULIAN_CENTURY;
    let r = polynomial(t, &[6.6460656, 2400.051262, 0.00002581]);
    let b = 24.0 - r + 24.0 * (year - 1900) as f64;
    let t0 = 0.0657098 * days - b;

    SiderealTime::greenwich(t0 + SIDEREAL_RATE * ut.decimal_hours())
}

/// Mean sidereal angle at Greenwich in degrees (Meeus 12.4)
pub fn mean_sidereal_angle(ut: &UniversalTime) -> f64 {
    let jd = ut.julian_day();
    let t = (jd - J2000) / JULIAN_CENTURY;
    normalize_degrees(
        280.46061837 + 360.98564736629 * (jd - J2000) + 0.000387933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

/// Apparent sidereal angle at Greenwich in degrees, corrected for nutation
pub fn apparent_sidereal_angle(ut: &UniversalTime) -> f64 {
    let t = ut.to_julian_centuries();
    let nutation = nutationlib::nutation_in_longitude(t);
    let obliquity = nutationlib::true_obliquity(t);
    normalize_degrees(mean_sidereal_angle(ut) + nutation * cos_deg(obliquity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_greenwich_sidereal_time() {
        // 1980 April 22, 14h36m51.67s UT -> 4h40m05.23s
        let ut = UniversalTime::new(
            NaiveDate::from_ymd_opt(1980, 4, 22)
                .unwrap()
                .and_hms_milli_opt(14, 36, 51, 670)
                .unwrap(),
        );
        assert_abs_diff_eq!(ut.to_sidereal_time().hours(), 4.668119, epsilon = 1e-4);
    }

    #[test]
    fn test_mean_and_apparent_sidereal_angle() {
        // 1987 April 10, 0h UT -> mean 13h10m46.3668s, apparent 13h10m46.1351s
        let ut = UniversalTime::from_ymd_hms(1987, 4, 10, 0, 0, 0).unwrap();
        assert_abs_diff_eq!(mean_sidereal_angle(&ut) / 15.0, 13.179546, epsilon = 1e-6);
        assert_abs_diff_eq!(apparent_sidereal_angle(&ut) / 15.0, 13.179482, epsilon = 1e-5);
    }

    #[test]
    fn test_longitude_shift() {
        let gst = SiderealTime::greenwich(23.0);
        let local = gst.at_longitude(30.0);
        assert_abs_diff_eq!(local.hours(), 1.0, epsilon = 1e-12);
        assert_eq!(local.longitude(), 30.0);

        let back = local.to_greenwich();
        assert_abs_diff_eq!(back.hours(), 23.0, epsilon = 1e-12);

        let west = local.at_longitude(-74.0);
        assert_abs_diff_eq!(west.hours(), 23.0 - 74.0 / 15.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hours_are_wrapped() {
        for hours in [-48.5, -0.1, 0.0, 23.99, 24.0, 100.25] {
            let st = SiderealTime::new(hours, 10.0);
            assert!((0.0..24.0).contains(&st.hours()));
        }
    }
}
