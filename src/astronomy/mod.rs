//! Day-level answers about the sky
//!
//! Every function takes civil date-times with a fixed UTC offset and
//! returns instants in the same offset. Events that do not happen, such as
//! a sunset during the midnight sun, are `None`.

mod meteors;
mod moon;
mod radiation;
mod sky;
mod sun;

pub use meteors::{
    active_meteor_showers, meteor_shower, meteor_shower_altitude, meteor_shower_azimuth,
    MeteorShowerPeak,
};
pub use moon::{
    is_moon_up, is_super_moon, moon_above_horizon_times, moon_altitude, moon_azimuth,
    moon_distance, moon_events, moon_parallactic_angle, moon_phase, moon_tilt, next_moon_phase,
    next_moonrise, next_moonset, MOON_STANDARD_ALTITUDE,
};
pub use radiation::{
    optimal_solar_panel_position, solar_radiation, solar_radiation_on_panel, SolarPanelPosition,
};
pub use sky::{
    location_from_stars, plate_solve, planet_events, planet_position, star_color_temperature,
    star_events, star_position, substellar_point, zenith_distance, CelestialObservation,
    DetectedStar, PlateSolveOptions, StarAltitudeReading,
};
pub use sun::{
    daylight_length, is_sun_up, next_sunrise, next_sunset, season, solar_longitude,
    sun_above_horizon_times, sun_altitude, sun_azimuth, sun_distance, sun_events, Season,
};

use crate::almanac::RiseSetTransitTimes;
use crate::time::{end_of_local_day, start_of_local_day};
use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

/// How far ahead a rise still counts as the start of the current window
const UPCOMING_RISE_HOURS: i64 = 6;

/// A span of time, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeWindow {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, time: &DateTime<FixedOffset>) -> bool {
        self.start <= *time && *time <= self.end
    }

    /// The overlap of two windows, if they share any instant
    pub fn intersection(&self, other: &TimeWindow) -> Option<TimeWindow> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then(|| TimeWindow::new(start, end))
    }

    /// The instant of the window nearest to `time`
    pub fn clamp(&self, time: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        time.clamp(self.start, self.end)
    }
}

/// Earliest candidate strictly after `time`
fn closest_future_time(
    time: &DateTime<FixedOffset>,
    candidates: &[Option<DateTime<FixedOffset>>],
) -> Option<DateTime<FixedOffset>> {
    candidates.iter().flatten().filter(|t| *t > time).min().copied()
}

/// Latest candidate at or before `time`
fn closest_past_time(
    time: &DateTime<FixedOffset>,
    candidates: &[Option<DateTime<FixedOffset>>],
) -> Option<DateTime<FixedOffset>> {
    candidates.iter().flatten().filter(|t| *t <= time).max().copied()
}

/// Candidate nearest to `time` in either direction
fn closest_time(
    time: &DateTime<FixedOffset>,
    candidates: &[Option<DateTime<FixedOffset>>],
) -> Option<DateTime<FixedOffset>> {
    candidates
        .iter()
        .flatten()
        .min_by_key(|t| (**t - *time).num_milliseconds().abs())
        .copied()
}

/// The window around `time` during which a body is above the horizon
///
/// When the body is down, the window returned is the one starting with
/// the next rise if that is close, otherwise the window that just ended.
fn above_horizon_times<F>(
    time: &DateTime<FixedOffset>,
    is_up: bool,
    events: F,
) -> Option<TimeWindow>
where
    F: Fn(&DateTime<FixedOffset>) -> RiseSetTransitTimes,
{
    let days = [
        events(&(*time - Duration::days(1))),
        events(time),
        events(&(*time + Duration::days(1))),
    ];
    let rises = days.map(|day| day.rise);
    let sets = days.map(|day| day.set);

    let start_of_day = start_of_local_day(time);
    let end_of_day = end_of_local_day(time);

    let last_rise = closest_past_time(time, &rises);
    let next_set = closest_future_time(time, &sets);

    if is_up {
        return Some(TimeWindow::new(
            last_rise.unwrap_or(start_of_day),
            next_set.unwrap_or(end_of_day),
        ));
    }

    let next_rise = closest_future_time(time, &rises);
    match next_rise {
        Some(rise) if rise - *time <= Duration::hours(UPCOMING_RISE_HOURS) => Some(
            TimeWindow::new(rise, next_set.unwrap_or(end_of_day)),
        ),
        _ => {
            let last_set = closest_past_time(time, &sets);
            if last_rise.is_none() && last_set.is_none() {
                None
            } else {
                Some(TimeWindow::new(
                    last_rise.unwrap_or(start_of_day),
                    last_set.unwrap_or(end_of_day),
                ))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Duration, FixedOffset, TimeZone};

    pub fn local(
        offset_hours: i32,
        (y, mo, d): (i32, u32, u32),
        (h, mi): (u32, u32),
    ) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(offset_hours * 3600)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
    }

    pub fn assert_within(
        expected: DateTime<FixedOffset>,
        actual: Option<DateTime<FixedOffset>>,
        tolerance: Duration,
    ) {
        let actual = actual.unwrap_or_else(|| panic!("expected {expected}, got None"));
        assert!(
            (expected - actual).num_seconds().abs() <= tolerance.num_seconds(),
            "expected {expected}, got {actual}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::local;
    use super::*;

    #[test]
    fn test_closest_times() {
        let now = local(0, (2020, 1, 2), (12, 0));
        let candidates = [
            Some(local(0, (2020, 1, 1), (12, 0))),
            Some(local(0, (2020, 1, 2), (11, 0))),
            None,
            Some(local(0, (2020, 1, 2), (15, 0))),
        ];
        assert_eq!(closest_future_time(&now, &candidates), candidates[3]);
        assert_eq!(closest_past_time(&now, &candidates), candidates[1]);
        assert_eq!(closest_time(&now, &candidates), candidates[1]);
        assert_eq!(closest_future_time(&now, &candidates[..2]), None);
    }

    #[test]
    fn test_window_for_body_that_is_up() {
        let now = local(0, (2020, 1, 2), (12, 0));
        let window = above_horizon_times(&now, true, |date| {
            RiseSetTransitTimes::new(
                Some(start_of_local_day(date) + Duration::hours(8)),
                None,
                Some(start_of_local_day(date) + Duration::hours(16)),
            )
        });
        assert_eq!(
            window,
            Some(TimeWindow::new(
                local(0, (2020, 1, 2), (8, 0)),
                local(0, (2020, 1, 2), (16, 0))
            ))
        );
    }

    #[test]
    fn test_window_for_body_that_never_rises() {
        let now = local(0, (2020, 1, 2), (12, 0));
        let window = above_horizon_times(&now, false, |_| RiseSetTransitTimes::default());
        assert_eq!(window, None);
    }

    #[test]
    fn test_window_duration() {
        let window = TimeWindow::new(local(0, (2020, 1, 2), (8, 0)), local(0, (2020, 1, 2), (9, 30)));
        assert_eq!(window.duration(), Duration::minutes(90));
        assert!(window.contains(&local(0, (2020, 1, 2), (9, 0))));
    }

    #[test]
    fn test_window_intersection_and_clamp() {
        let night = TimeWindow::new(local(0, (2020, 1, 1), (18, 0)), local(0, (2020, 1, 2), (6, 0)));
        let visible = TimeWindow::new(local(0, (2020, 1, 2), (2, 0)), local(0, (2020, 1, 2), (14, 0)));
        assert_eq!(
            night.intersection(&visible),
            Some(TimeWindow::new(local(0, (2020, 1, 2), (2, 0)), local(0, (2020, 1, 2), (6, 0))))
        );
        let later = TimeWindow::new(local(0, (2020, 1, 2), (7, 0)), local(0, (2020, 1, 2), (8, 0)));
        assert_eq!(night.intersection(&later), None);
        assert_eq!(night.clamp(local(0, (2020, 1, 2), (9, 0))), night.end);
        assert_eq!(night.clamp(local(0, (2020, 1, 1), (23, 0))), local(0, (2020, 1, 1), (23, 0)));
    }
}
