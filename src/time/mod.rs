//! Time module for astronomical time calculations
//!
//! This module provides [`UniversalTime`], the instant type every locator and
//! solver in the crate consumes, together with conversions to and from Julian
//! Day, Julian centuries since J2000.0, sidereal time and the terrestrial time
//! argument used by the slowly varying solar and lunar series.
//!
//! Calendar fields are proleptic Gregorian throughout, the same calendar chrono
//! uses, so Julian Day is continuous and monotonic across 1582.

pub mod sidereal;

pub use sidereal::SiderealTime;

use crate::constants::{DAY_S, J2000, JULIAN_CENTURY};
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Utc,
};
use std::fmt;
use std::ops::{Add, Sub};
use thiserror::Error;

/// Error type for time operations
#[derive(Debug, Error, PartialEq)]
pub enum TimeError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Time out of range: {0}")]
    OutOfRange(String),
}

/// Result type for time operations
pub type Result<T> = std::result::Result<T, TimeError>;

/// A calendar date-time understood to be in Universal Time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UniversalTime(NaiveDateTime);

impl UniversalTime {
    /// Wrap a naive date-time that is already in UT
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    /// Build a UT instant from calendar fields, rejecting impossible dates
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .map(Self)
            .ok_or_else(|| {
                TimeError::InvalidDate(format!(
                    "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                ))
            })
    }

    /// The current instant
    pub fn now() -> Self {
        Self(Utc::now().naive_utc())
    }

    /// The underlying naive date-time in UT
    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// This instant as a UTC date-time
    pub fn to_utc(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.0)
    }

    /// This instant viewed in a fixed UTC offset
    pub fn to_local(&self, offset: &FixedOffset) -> DateTime<FixedOffset> {
        offset.from_utc_datetime(&self.0)
    }

    /// The UT calendar date
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// 0h UT on the same UT date
    pub fn at_start_of_day(&self) -> Self {
        Self(self.0.date().and_time(NaiveTime::MIN))
    }

    /// Hours since 0h UT, including fractional seconds
    pub fn decimal_hours(&self) -> f64 {
        let time = self.0.time();
        time.hour() as f64
            + time.minute() as f64 / 60.0
            + (time.second() as f64 + time.nanosecond() as f64 * 1e-9) / 3600.0
    }

    /// Year with the elapsed fraction of that year, e.g. 2020.5 in early July
    pub fn decimal_year(&self) -> f64 {
        let year = self.0.year();
        let days_in_year = if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
            366.0
        } else {
            365.0
        };
        year as f64 + (self.0.ordinal0() as f64 + self.decimal_hours() / 24.0) / days_in_year
    }

    /// Shift by a fractional number of days, rounded to the millisecond
    pub fn plus_days(&self, days: f64) -> Self {
        *self + Duration::milliseconds((days * DAY_S * 1000.0).round() as i64)
    }

    /// Shift by a fractional number of hours, rounded to the millisecond
    pub fn plus_hours(&self, hours: f64) -> Self {
        self.plus_days(hours / 24.0)
    }

    /// Julian Day of this instant (Meeus ch. 7)
    ///
    /// With `include_time` false, the result is the Julian Day of 0h UT on the
    /// same date.
    pub fn to_julian_day(&self, include_time: bool) -> f64 {
        let date = self.0.date();
        let mut year = date.year() as f64;
        let mut month = date.month() as f64;
        let mut day = date.day() as f64;
        if include_time {
            day += self.decimal_hours() / 24.0;
        }

        if month <= 2.0 {
            year -= 1.0;
            month += 12.0;
        }

        let a = (year / 100.0).floor();
        let b = 2.0 - a + (a / 4.0).floor();

        (365.25 * (year + 4716.0)).floor() + (30.6001 * (month + 1.0)).floor() + day + b - 1524.5
    }

    /// Julian Day including the time of day
    pub fn julian_day(&self) -> f64 {
        self.to_julian_day(true)
    }

    /// Julian centuries since J2000.0
    pub fn to_julian_centuries(&self) -> f64 {
        (self.julian_day() - J2000) / JULIAN_CENTURY
    }

    /// Convert a Julian Day back to a UT instant
    ///
    /// Sub-second fractions are rounded to the nearest millisecond.
    pub fn from_julian_day(jd: f64) -> Result<Self> {
        if !jd.is_finite() {
            return Err(TimeError::OutOfRange(format!("Julian day {jd}")));
        }

        let shifted = jd + 0.5;
        let z = shifted.floor();
        let f = shifted - z;

        let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
        let a = z + 1.0 + alpha - (alpha / 4.0).floor();

        let b = a + 1524.0;
        let c = ((b - 122.1) / 365.25).floor();
        let d = (365.25 * c).floor();
        let e = ((b - d) / 30.6001).floor();

        let day = b - d - (30.6001 * e).floor();
        let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
        let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

        if year.abs() > 200_000.0 {
            return Err(TimeError::OutOfRange(format!("Julian day {jd}")));
        }

        let midnight = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
            .ok_or_else(|| TimeError::OutOfRange(format!("Julian day {jd}")))?
            .and_time(NaiveTime::MIN);
        let millis = (f * DAY_S * 1000.0).round() as i64;

        Ok(Self(midnight + Duration::milliseconds(millis)))
    }

    /// Difference TT - UT in seconds for this instant
    pub fn delta_t(&self) -> f64 {
        delta_t(self.decimal_year())
    }

    /// The terrestrial time argument for this instant (TT = UT + delta T)
    pub fn to_terrestrial_time(&self) -> Self {
        self.plus_days(self.delta_t() / DAY_S)
    }

    /// Julian centuries since J2000.0 on the terrestrial time scale
    pub fn terrestrial_centuries(&self) -> f64 {
        (self.julian_day() + self.delta_t() / DAY_S - J2000) / JULIAN_CENTURY
    }

    /// Greenwich sidereal time at this instant
    pub fn to_sidereal_time(&self) -> SiderealTime {
        sidereal::greenwich_sidereal_time(self)
    }

    /// The 0h UT instant whose date, seen in the local offset, is the local date
    ///
    /// For negative offsets this is the following UT date, since 0h UT falls on
    /// the previous local evening.
    pub fn ut0h_on_date(local: &DateTime<FixedOffset>) -> Self {
        let local_date = local.date_naive();
        for offset_days in -1..=1 {
            let candidate =
                Self((local_date + Duration::days(offset_days)).and_time(NaiveTime::MIN));
            if candidate.to_local(local.offset()).date_naive() == local_date {
                return candidate;
            }
        }
        Self(local_date.and_time(NaiveTime::MIN))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for UniversalTime {
    fn from(datetime: DateTime<Tz>) -> Self {
        Self(datetime.naive_utc())
    }
}

impl<Tz: TimeZone> From<&DateTime<Tz>> for UniversalTime {
    fn from(datetime: &DateTime<Tz>) -> Self {
        Self(datetime.naive_utc())
    }
}

impl fmt::Display for UniversalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} UT", self.0.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }
}

impl Add<Duration> for UniversalTime {
    type Output = Self;

    fn add(self, duration: Duration) -> Self::Output {
        Self(self.0 + duration)
    }
}

impl Sub<Duration> for UniversalTime {
    type Output = Self;

    fn sub(self, duration: Duration) -> Self::Output {
        Self(self.0 - duration)
    }
}

impl Sub<UniversalTime> for UniversalTime {
    type Output = Duration;

    fn sub(self, other: UniversalTime) -> Self::Output {
        self.0 - other.0
    }
}

/// Midnight at the start of the local calendar day of `local`
pub fn start_of_local_day(local: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let offset = *local.offset();
    let midnight = local.date_naive().and_time(NaiveTime::MIN);
    offset.from_utc_datetime(&(midnight - Duration::seconds(offset.local_minus_utc() as i64)))
}

/// The last millisecond of the local calendar day of `local`
pub fn end_of_local_day(local: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    start_of_local_day(local) + Duration::days(1) - Duration::milliseconds(1)
}

/// The same wall-clock instant moved to a given local hour of its day
pub fn at_local_hour(local: &DateTime<FixedOffset>, hour: u32) -> DateTime<FixedOffset> {
    start_of_local_day(local) + Duration::hours(hour as i64)
}

/// Approximate TT - UT in seconds for a decimal year
///
/// Piecewise polynomial fits to the historical record and to the long-term
/// parabola outside it.
pub fn delta_t(year: f64) -> f64 {
    if year < -500.0 {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    } else if year < 500.0 {
        let t = year / 100.0;
        10583.6 - 1014.41 * t + 33.78311 * t * t - 5.952053 * t.powi(3) - 0.1798452 * t.powi(4)
            + 0.022174192 * t.powi(5)
            + 0.0090316521 * t.powi(6)
    } else if year < 1600.0 {
        let t = (year - 1000.0) / 100.0;
        1574.2 - 556.01 * t + 71.23472 * t * t + 0.319781 * t.powi(3)
            - 0.8503463 * t.powi(4)
            - 0.005050998 * t.powi(5)
            + 0.0083572073 * t.powi(6)
    } else if year < 1700.0 {
        let t = year - 1600.0;
        120.0 - 0.9808 * t - 0.01532 * t * t + t.powi(3) / 7129.0
    } else if year < 1800.0 {
        let t = year - 1700.0;
        8.83 + 0.1603 * t - 0.0059285 * t * t + 0.00013336 * t.powi(3) - t.powi(4) / 1174000.0
    } else if year < 1860.0 {
        let t = year - 1800.0;
        13.72 - 0.332447 * t + 0.0068612 * t * t + 0.0041116 * t.powi(3)
            - 0.00037436 * t.powi(4)
            + 0.0000121272 * t.powi(5)
            - 0.0000001699 * t.powi(6)
            + 0.000000000875 * t.powi(7)
    } else if year < 1900.0 {
        let t = year - 1860.0;
        7.62 + 0.5737 * t - 0.251754 * t * t + 0.01680668 * t.powi(3) - 0.0004473624 * t.powi(4)
            + t.powi(5) / 233174.0
    } else if year < 1920.0 {
        let t = year - 1900.0;
        -2.79 + 1.494119 * t - 0.0598939 * t * t + 0.0061966 * t.powi(3) - 0.000197 * t.powi(4)
    } else if year < 1941.0 {
        let t = year - 1920.0;
        21.20 + 0.84493 * t - 0.076100 * t * t + 0.0020936 * t.powi(3)
    } else if year < 1961.0 {
        let t = year - 1950.0;
        29.07 + 0.407 * t - t * t / 233.0 + t.powi(3) / 2547.0
    } else if year < 1986.0 {
        let t = year - 1975.0;
        45.45 + 1.067 * t - t * t / 260.0 - t.powi(3) / 718.0
    } else if year < 2005.0 {
        let t = year - 2000.0;
        63.86 + 0.3345 * t - 0.060374 * t * t
            + 0.0017275 * t.powi(3)
            + 0.000651814 * t.powi(4)
            + 0.00002373599 * t.powi(5)
    } else if year < 2050.0 {
        let t = year - 2000.0;
        62.92 + 0.32217 * t + 0.005589 * t * t
    } else if year < 2150.0 {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - year)
    } else {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    }
}
