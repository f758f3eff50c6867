//! Skycalc: positions, rise/set times and events of the Sun, Moon, planets,
//! bright stars and meteor showers
//!
//! The crate is built on the algorithms of Jean Meeus (*Astronomical
//! Algorithms*, 2nd edition) and is accurate to roughly a minute of time
//! for rise/set events. Every calculation is a pure function of its inputs.
//!
//! Most callers want the [`astronomy`] facade:
//!
//! ```no_run
//! use chrono::{FixedOffset, TimeZone};
//! use skycalc::almanac::SunTimesMode;
//! use skycalc::astronomy;
//! use skycalc::coordinates::Location;
//!
//! let new_york = Location::new(40.7128, -74.0060)?;
//! let date = FixedOffset::west_opt(4 * 3600)
//!     .unwrap()
//!     .with_ymd_and_hms(2020, 9, 12, 12, 0, 0)
//!     .unwrap();
//! let sun = astronomy::sun_events(&date, &new_york, SunTimesMode::Actual, false);
//! println!("sunrise {:?}, sunset {:?}", sun.rise, sun.set);
//! # Ok::<(), skycalc::SkycalcError>(())
//! ```

use thiserror::Error;

pub mod almanac;
pub mod astronomy;
pub mod celestial;
pub mod constants;
pub mod coordinates;
pub mod eclipse;
pub mod nutationlib;
pub mod planetlib;
pub mod positions;
pub mod precessionlib;
pub mod time;
pub mod units;

// Re-export commonly used types
pub use celestial::{Body, CelestialObject};
pub use coordinates::Location;
pub use time::UniversalTime;

/// Main error type for the skycalc library
#[derive(Debug, Error, PartialEq)]
pub enum SkycalcError {
    #[error("Time error: {0}")]
    Time(#[from] time::TimeError),

    #[error("Coordinate error: {0}")]
    Coordinate(#[from] coordinates::CoordinateError),

    #[error("Unknown body: {0}")]
    UnknownBody(String),
}

/// Result type for skycalc operations
pub type Result<T> = std::result::Result<T, SkycalcError>;
