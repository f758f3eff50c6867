//! Lunar and solar eclipses seen from a location
//!
//! Lunar eclipses come from the lunation tables of Meeus ch. 54 and are
//! kept when the Moon is up for part of the umbral phase. Solar eclipses
//! are found by comparing the topocentric discs of the Sun and the Moon
//! around each new moon near a lunar node.

mod lunar;
mod solar;

pub use solar::{solar_eclipse_magnitude, solar_eclipse_obscuration};

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// How far past `after` a solar eclipse is searched for by default
pub const DEFAULT_SOLAR_SEARCH_DAYS: i64 = 5 * 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EclipseType {
    /// Any part of the Moon enters the umbra
    PartialLunar,
    /// The whole Moon is inside the umbra
    TotalLunar,
    /// The Moon covers part of the Sun as seen from the location
    Solar,
}

/// A single eclipse as seen from one location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Eclipse {
    pub start: DateTime<FixedOffset>,
    /// Time of greatest eclipse
    pub peak: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    /// Fraction of the eclipsed body's diameter covered at the peak
    pub magnitude: f64,
    /// Fraction of the eclipsed body's area covered at the peak, [0, 1]
    pub obscuration: f64,
}

impl Eclipse {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// The first eclipse of `kind` that ends after `after` and is visible from
/// `location`
///
/// `max_search` bounds how far ahead solar eclipses are looked for and
/// defaults to five years. Lunar eclipses are searched for up to 100
/// lunations. Times are returned in the offset of `after`.
pub fn next_eclipse(
    after: &DateTime<FixedOffset>,
    location: &crate::Location,
    kind: EclipseType,
    max_search: Option<Duration>,
) -> Option<Eclipse> {
    match kind {
        EclipseType::PartialLunar => lunar::next_lunar_eclipse(after, location, false),
        EclipseType::TotalLunar => lunar::next_lunar_eclipse(after, location, true),
        EclipseType::Solar => solar::next_solar_eclipse(
            after,
            location,
            max_search.unwrap_or_else(|| Duration::days(DEFAULT_SOLAR_SEARCH_DAYS)),
        ),
    }
}

/// Fraction of the disc of radius `covered` hidden by a disc of radius
/// `cover` whose center is `distance` away
fn overlap(cover: f64, covered: f64, distance: f64) -> f64 {
    if distance >= cover + covered {
        return 0.0;
    }
    if distance <= (cover - covered).abs() {
        return ((cover / covered).powi(2)).min(1.0);
    }

    let d2 = distance * distance;
    let (r1, r2) = (cover * cover, covered * covered);
    let lens = r1 * ((d2 + r1 - r2) / (2.0 * distance * cover)).acos()
        + r2 * ((d2 + r2 - r1) / (2.0 * distance * covered)).acos()
        - 0.5
            * ((-distance + cover + covered)
                * (distance + cover - covered)
                * (distance - cover + covered)
                * (distance + cover + covered))
                .sqrt();
    (lens / (PI * r2)).clamp(0.0, 1.0)
}
