//! Rise, set and transit times
//!
//! Event times for a single local calendar day are found in two stages. The
//! interpolation solver of Meeus ch. 15 handles the common case in a handful
//! of iterations. Whatever it cannot place on the requested date, typically
//! events of fast-moving or nearly circumpolar bodies, is then looked for by
//! an hourly altitude scan refined with binary and ternary searches.
//!
//! An event that does not occur on the date is `None`. Whether a body with
//! no rise or set is always up or always down is answered separately by its
//! altitude.

pub mod interpolation;
pub mod search;

use crate::celestial::CelestialObject;
use crate::coordinates::Location;
use crate::positions::ObservationOptions;
use chrono::{DateTime, FixedOffset};
use log::debug;
use serde::{Deserialize, Serialize};

/// Iteration cap of the interpolation solver
pub const MAX_ITERATIONS: usize = 20;

/// Correction, as a fraction of a day, below which an event is converged
pub const CONVERGENCE_THRESHOLD: f64 = 0.0001;

/// Rise, transit and set of a body on one local day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiseSetTransitTimes {
    pub rise: Option<DateTime<FixedOffset>>,
    pub transit: Option<DateTime<FixedOffset>>,
    pub set: Option<DateTime<FixedOffset>>,
}

impl RiseSetTransitTimes {
    pub fn new(
        rise: Option<DateTime<FixedOffset>>,
        transit: Option<DateTime<FixedOffset>>,
        set: Option<DateTime<FixedOffset>>,
    ) -> Self {
        Self { rise, transit, set }
    }

    /// True when rise, transit and set were all found
    pub fn is_complete(&self) -> bool {
        self.rise.is_some() && self.transit.is_some() && self.set.is_some()
    }

    /// Fill missing events from `other`
    pub fn or(self, other: RiseSetTransitTimes) -> Self {
        Self {
            rise: self.rise.or(other.rise),
            transit: self.transit.or(other.transit),
            set: self.set.or(other.set),
        }
    }
}

/// Which edge of the Sun's disc, or which twilight, counts as sunrise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SunTimesMode {
    /// Upper limb on the horizon
    #[default]
    Actual,
    Civil,
    Nautical,
    Astronomical,
}

impl SunTimesMode {
    /// Altitude of the Sun's center in degrees at which the event happens
    pub fn altitude(&self) -> f64 {
        match self {
            SunTimesMode::Actual => -0.8333,
            SunTimesMode::Civil => -6.0,
            SunTimesMode::Nautical => -12.0,
            SunTimesMode::Astronomical => -18.0,
        }
    }
}

/// Rise, transit and set of `body` on the local calendar day of `date`
///
/// `standard_altitude` is the altitude in degrees the body's center crosses
/// at rise and set. Events the interpolation solver misses are searched for
/// directly.
pub fn rise_set_transit<B: CelestialObject + ?Sized>(
    body: &B,
    date: &DateTime<FixedOffset>,
    location: &Location,
    standard_altitude: f64,
    options: ObservationOptions,
) -> RiseSetTransitTimes {
    let interpolated =
        interpolation::rise_set_transit(body, date, location, standard_altitude, options);
    if interpolated.is_complete() {
        return interpolated;
    }

    debug!(
        "Interpolation left events missing on {}, falling back to search",
        date.date_naive()
    );
    let searched = search::rise_set_transit(body, date, location, standard_altitude, options);
    interpolated.or(searched)
}
