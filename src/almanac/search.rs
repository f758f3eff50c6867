//! Direct search for rise, transit and set
//!
//! The altitude is sampled once an hour across the local day. Each hour in
//! which it crosses the threshold, or turns from climbing to falling, is
//! then narrowed down by bisection.

use super::RiseSetTransitTimes;
use crate::celestial::CelestialObject;
use crate::coordinates::Location;
use crate::positions::{self, ObservationOptions};
use crate::time::{start_of_local_day, UniversalTime};
use chrono::{DateTime, Duration, FixedOffset};
use log::trace;

/// Bounds for a bisection over time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSearch {
    /// Width of the interval at which a search stops
    pub precision: Duration,
    /// Hard cap on halving or trisecting steps
    pub max_iterations: usize,
}

impl Default for TimeSearch {
    fn default() -> Self {
        Self {
            precision: Duration::minutes(1),
            max_iterations: 100,
        }
    }
}

impl TimeSearch {
    pub fn new(precision: Duration, max_iterations: usize) -> Self {
        Self {
            precision,
            max_iterations,
        }
    }

    /// First instant in `[start, end]` at which `predicate` holds
    ///
    /// The predicate is expected to be false at `start` and to stay true
    /// once it becomes true.
    pub fn find_start<F>(
        &self,
        start: UniversalTime,
        end: UniversalTime,
        predicate: F,
    ) -> Option<UniversalTime>
    where
        F: Fn(&UniversalTime) -> bool,
    {
        let (mut left, mut right) = (start, end);
        let mut found = false;
        let mut iterations = 0;
        while right - left > self.precision && iterations < self.max_iterations {
            let middle = left + (right - left) / 2;
            if predicate(&middle) {
                found = true;
                right = middle;
            } else {
                left = middle;
            }
            iterations += 1;
        }
        found.then_some(right)
    }

    /// Last instant in `[start, end]` at which `predicate` still holds
    pub fn find_end<F>(
        &self,
        start: UniversalTime,
        end: UniversalTime,
        predicate: F,
    ) -> Option<UniversalTime>
    where
        F: Fn(&UniversalTime) -> bool,
    {
        let (mut left, mut right) = (start, end);
        let mut found = false;
        let mut iterations = 0;
        while right - left > self.precision && iterations < self.max_iterations {
            let middle = left + (right - left) / 2;
            if predicate(&middle) {
                found = true;
                left = middle;
            } else {
                right = middle;
            }
            iterations += 1;
        }
        found.then_some(left)
    }

    /// Instant of the maximum of a unimodal `f` on `[start, end]`
    pub fn find_peak<F>(&self, start: UniversalTime, end: UniversalTime, f: F) -> UniversalTime
    where
        F: Fn(&UniversalTime) -> f64,
    {
        let (mut left, mut right) = (start, end);
        let mut iterations = 0;
        while right - left > self.precision && iterations < self.max_iterations {
            let third = (right - left) / 3;
            let middle_left = left + third;
            let middle_right = left + third * 2;
            if f(&middle_left) < f(&middle_right) {
                left = middle_left;
            } else {
                right = middle_right;
            }
            iterations += 1;
        }
        if f(&left) > f(&right) {
            left
        } else {
            right
        }
    }
}

/// Rise, transit and set of `body` on the local day of `date` found by
/// scanning its altitude
pub fn rise_set_transit<B: CelestialObject + ?Sized>(
    body: &B,
    date: &DateTime<FixedOffset>,
    location: &Location,
    standard_altitude: f64,
    options: ObservationOptions,
) -> RiseSetTransitTimes {
    let altitude = |ut: &UniversalTime| positions::altitude(body, ut, location, options);
    let is_up = |ut: &UniversalTime| altitude(ut) >= standard_altitude;

    let offset = date.offset();
    let local_date = date.date_naive();
    let hour = Duration::hours(1);

    let mut time = UniversalTime::from(start_of_local_day(date));
    let mut last = altitude(&time);
    let mut rising = last > altitude(&(time - hour));

    let mut rise_range = None;
    let mut set_range = None;
    let mut transit_range = None;

    while time.to_local(offset).date_naive() == local_date {
        let current = altitude(&time);

        if last >= standard_altitude && current < standard_altitude {
            set_range = Some((time - hour, time));
        }
        if last <= standard_altitude && current > standard_altitude {
            rise_range = Some((time - hour, time));
        }
        if transit_range.is_none() {
            let climbing = current > altitude(&(time - Duration::minutes(1)));
            if rising && !climbing && current >= standard_altitude {
                transit_range = Some((time - hour, time));
            }
            rising = climbing;
        }

        if rise_range.is_some() && set_range.is_some() && transit_range.is_some() {
            break;
        }
        last = current;
        time = time + hour;
    }
    trace!("search ranges: rise {rise_range:?}, transit {transit_range:?}, set {set_range:?}");

    let search = TimeSearch::default();
    let widen = |(start, end): (UniversalTime, UniversalTime)| {
        (start - search.precision, end + search.precision)
    };

    let rise = rise_range
        .map(widen)
        .and_then(|(start, end)| search.find_start(start, end, is_up));
    let set = set_range
        .map(widen)
        .and_then(|(start, end)| search.find_end(start, end, is_up));
    let transit = transit_range
        .map(widen)
        .map(|(start, end)| search.find_peak(start, end, altitude))
        .filter(is_up);

    let to_local = |ut: Option<UniversalTime>| ut.map(|ut| ut.to_local(offset));
    RiseSetTransitTimes::new(to_local(rise), to_local(transit), to_local(set))
}
