use super::{above_horizon_times, closest_future_time, TimeWindow};
use crate::almanac::{self, RiseSetTransitTimes, SunTimesMode};
use crate::celestial::{CelestialObject, Sun};
use crate::coordinates::angle::normalize_degrees;
use crate::coordinates::Location;
use crate::positions::{self, ObservationOptions};
use crate::time::{end_of_local_day, start_of_local_day, UniversalTime};
use crate::units::Distance;
use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

/// Astronomical season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

/// Sunrise, solar noon and sunset on the local day of `date`
pub fn sun_events(
    date: &DateTime<FixedOffset>,
    location: &Location,
    mode: SunTimesMode,
    with_refraction: bool,
) -> RiseSetTransitTimes {
    almanac::rise_set_transit(
        &Sun,
        date,
        location,
        mode.altitude(),
        ObservationOptions::new(with_refraction, false),
    )
}

pub fn sun_altitude(time: &DateTime<FixedOffset>, location: &Location, with_refraction: bool) -> f64 {
    positions::altitude(
        &Sun,
        &UniversalTime::from(time),
        location,
        ObservationOptions::new(with_refraction, false),
    )
}

pub fn sun_azimuth(time: &DateTime<FixedOffset>, location: &Location) -> f64 {
    positions::azimuth(
        &Sun,
        &UniversalTime::from(time),
        location,
        ObservationOptions::default(),
    )
}

/// The first sunrise after `time`, looking at most one day ahead
pub fn next_sunrise(
    time: &DateTime<FixedOffset>,
    location: &Location,
    mode: SunTimesMode,
    with_refraction: bool,
) -> Option<DateTime<FixedOffset>> {
    let today = sun_events(time, location, mode, with_refraction);
    let tomorrow = sun_events(&(*time + Duration::days(1)), location, mode, with_refraction);
    closest_future_time(time, &[today.rise, tomorrow.rise])
}

/// The first sunset after `time`, looking at most one day ahead
pub fn next_sunset(
    time: &DateTime<FixedOffset>,
    location: &Location,
    mode: SunTimesMode,
    with_refraction: bool,
) -> Option<DateTime<FixedOffset>> {
    let today = sun_events(time, location, mode, with_refraction);
    let tomorrow = sun_events(&(*time + Duration::days(1)), location, mode, with_refraction);
    closest_future_time(time, &[today.set, tomorrow.set])
}

pub fn is_sun_up(time: &DateTime<FixedOffset>, location: &Location, with_refraction: bool) -> bool {
    sun_altitude(time, location, with_refraction) > 0.0
}

/// Time the Sun spends above the `mode` threshold on the local day of `date`
///
/// With no crossing that day, the whole day counts when the Sun is above
/// the threshold at its start.
pub fn daylight_length(
    date: &DateTime<FixedOffset>,
    location: &Location,
    mode: SunTimesMode,
) -> Duration {
    let start_of_day = start_of_local_day(date);
    let end_of_day = start_of_day + Duration::days(1);
    let sunrise = next_sunrise(&start_of_day, location, mode, false);
    let sunset = next_sunset(&start_of_day, location, mode, false);

    match (sunrise, sunset) {
        (Some(rise), Some(set)) if set > rise => set - rise,
        (None, None) => {
            if sun_altitude(&start_of_day, location, false) > mode.altitude() {
                Duration::days(1)
            } else {
                Duration::zero()
            }
        }
        (Some(rise), None) => end_of_day - rise,
        (None, Some(set)) => set - start_of_day,
        // Sets in the morning and rises again in the evening
        (Some(rise), Some(set)) => (set - start_of_day) + (end_of_day - rise),
    }
}

pub fn sun_distance(time: &DateTime<FixedOffset>) -> Distance {
    let ut = UniversalTime::from(time);
    Sun.distance_at(ut.terrestrial_centuries())
}

/// The daylight window around `time`
pub fn sun_above_horizon_times(
    time: &DateTime<FixedOffset>,
    location: &Location,
    with_refraction: bool,
) -> Option<TimeWindow> {
    above_horizon_times(time, is_sun_up(time, location, with_refraction), |date| {
        sun_events(date, location, SunTimesMode::Actual, with_refraction)
    })
}

/// Apparent ecliptic longitude of the Sun in degrees
pub fn solar_longitude(time: &DateTime<FixedOffset>) -> f64 {
    solar_longitude_at(&UniversalTime::from(time))
}

pub(super) fn solar_longitude_at(ut: &UniversalTime) -> f64 {
    normalize_degrees(Sun.position_at(ut).to_ecliptic(ut).longitude)
}

/// The dark window nearest to `time`, bounded by the `mode` twilight
///
/// Last night is chosen over tonight when `time` is closer to its end than
/// to tonight's start. A day on which the Sun stays below the threshold is
/// one long night; a day on which it never sets has none.
pub(super) fn closest_night(
    time: &DateTime<FixedOffset>,
    location: &Location,
    mode: SunTimesMode,
) -> Option<TimeWindow> {
    let yesterday = sun_events(&(*time - Duration::days(1)), location, mode, false);
    let today = sun_events(time, location, mode, false);
    let tomorrow = sun_events(&(*time + Duration::days(1)), location, mode, false);

    match (yesterday.set, today.rise, today.set, tomorrow.rise) {
        (Some(last_dusk), Some(dawn), Some(dusk), Some(next_dawn)) => {
            let last_night = TimeWindow::new(last_dusk, dawn);
            let tonight = TimeWindow::new(dusk, next_dawn);
            if (last_night.end - *time).abs() < (tonight.start - *time).abs() {
                Some(last_night)
            } else {
                Some(tonight)
            }
        }
        _ if today.rise.is_none() && sun_altitude(time, location, false) < mode.altitude() => {
            Some(TimeWindow::new(
                start_of_local_day(time),
                end_of_local_day(time),
            ))
        }
        _ => None,
    }
}

/// Season at `location`, bounded by the equinoxes and solstices
pub fn season(location: &Location, date: &DateTime<FixedOffset>) -> Season {
    let longitude = solar_longitude(date);
    let north = location.is_northern_hemisphere();
    let (northern, southern) = if longitude >= 270.0 {
        (Season::Winter, Season::Summer)
    } else if longitude >= 180.0 {
        (Season::Fall, Season::Spring)
    } else if longitude >= 90.0 {
        (Season::Summer, Season::Winter)
    } else {
        (Season::Spring, Season::Fall)
    };
    if north {
        northern
    } else {
        southern
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{assert_within, local};
    use super::*;
    use approx::assert_abs_diff_eq;

    fn new_york() -> Location {
        Location::new(40.7128, -74.0060).unwrap()
    }

    fn greenland() -> Location {
        Location::new(76.7667, -18.6667).unwrap()
    }

    #[test]
    fn test_sun_events_with_refraction() {
        let cases = [
            (new_york(), -4, (2020, 6, 21), [(5, 25), (12, 58), (20, 31)]),
            (Location::new(51.5074, -0.1278).unwrap(), 1, (2020, 10, 29), [(7, 48), (12, 44), (17, 39)]),
            (Location::new(50.0755, 14.4378).unwrap(), 1, (2022, 12, 27), [(8, 0), (12, 3), (16, 8)]),
            (greenland(), 0, (2020, 10, 30), [(12, 5), (12, 58), (13, 49)]),
        ];
        for (location, offset, date, [rise, transit, set]) in cases {
            let events = sun_events(&local(offset, date, (12, 0)), &location, SunTimesMode::Actual, true);
            let tolerance = Duration::minutes(3);
            assert_within(local(offset, date, rise), events.rise, tolerance);
            assert_within(local(offset, date, transit), events.transit, tolerance);
            assert_within(local(offset, date, set), events.set, tolerance);
        }
    }

    #[test]
    fn test_midnight_sun_only_transits() {
        let events = sun_events(&local(0, (2020, 6, 4), (12, 0)), &greenland(), SunTimesMode::Actual, true);
        assert_eq!(events.rise, None);
        assert_eq!(events.set, None);
        assert_within(local(0, (2020, 6, 4), (13, 13)), events.transit, Duration::minutes(2));
    }

    #[test]
    fn test_next_sunset_and_sunrise() {
        let tolerance = Duration::minutes(2);
        let morning = local(-4, (2020, 9, 13), (9, 0));
        assert_within(
            local(-4, (2020, 9, 13), (19, 7)),
            next_sunset(&morning, &new_york(), SunTimesMode::Actual, false),
            tolerance,
        );
        let evening = local(-4, (2020, 9, 13), (20, 0));
        assert_within(
            local(-4, (2020, 9, 14), (19, 5)),
            next_sunset(&evening, &new_york(), SunTimesMode::Actual, false),
            tolerance,
        );
        assert_within(
            local(-4, (2020, 9, 14), (6, 36)),
            next_sunrise(&evening, &new_york(), SunTimesMode::Actual, false),
            tolerance,
        );
        let polar_day = local(0, (2020, 6, 4), (12, 0));
        assert_eq!(next_sunset(&polar_day, &greenland(), SunTimesMode::Actual, false), None);
    }

    #[test]
    fn test_is_sun_up() {
        assert!(is_sun_up(&local(-4, (2020, 9, 13), (12, 0)), &new_york(), false));
        assert!(!is_sun_up(&local(-4, (2020, 9, 13), (23, 0)), &new_york(), false));
    }

    #[test]
    fn test_daylight_length() {
        let equator = Location::new(0.0, 0.0).unwrap();
        let length = daylight_length(&local(0, (2021, 3, 20), (0, 0)), &equator, SunTimesMode::Actual);
        assert!((length - Duration::minutes(12 * 60 + 6)).num_minutes().abs() <= 3);

        let polar_day = daylight_length(&local(0, (2020, 6, 4), (0, 0)), &greenland(), SunTimesMode::Actual);
        assert_eq!(polar_day, Duration::days(1));

        let polar_night = daylight_length(&local(0, (2020, 12, 4), (0, 0)), &greenland(), SunTimesMode::Actual);
        assert_eq!(polar_night, Duration::zero());

        // Below the horizon all day but never darker than civil twilight
        let pole = Location::new(89.5, 0.0).unwrap();
        let date = local(0, (2021, 10, 5), (0, 0));
        assert_eq!(daylight_length(&date, &pole, SunTimesMode::Actual), Duration::zero());
        assert_eq!(daylight_length(&date, &pole, SunTimesMode::Civil), Duration::days(1));
    }

    #[test]
    fn test_sun_distance() {
        let perihelion = sun_distance(&local(0, (2021, 1, 2), (14, 0)));
        assert_abs_diff_eq!(perihelion.kilometers(), 147_093_163.0, epsilon = 50_000.0);
    }

    #[test]
    fn test_above_horizon_window() {
        let tolerance = Duration::minutes(2);
        let noon = local(-4, (2020, 9, 12), (12, 0));
        let window = sun_above_horizon_times(&noon, &new_york(), false).unwrap();
        assert_within(local(-4, (2020, 9, 12), (6, 34)), Some(window.start), tolerance);
        assert_within(local(-4, (2020, 9, 12), (19, 9)), Some(window.end), tolerance);

        // Sunrise is too far off, so the previous day's window is reported
        let midnight = local(-4, (2020, 9, 12), (0, 0));
        let window = sun_above_horizon_times(&midnight, &new_york(), false).unwrap();
        assert_within(local(-4, (2020, 9, 11), (6, 33)), Some(window.start), tolerance);
        assert_within(local(-4, (2020, 9, 11), (19, 11)), Some(window.end), tolerance);

        let early = local(-4, (2020, 9, 12), (2, 0));
        let window = sun_above_horizon_times(&early, &new_york(), false).unwrap();
        assert_within(local(-4, (2020, 9, 12), (6, 34)), Some(window.start), tolerance);

        let polar_day = local(0, (2020, 6, 4), (12, 0));
        let window = sun_above_horizon_times(&polar_day, &greenland(), false).unwrap();
        assert_eq!(window.start, local(0, (2020, 6, 4), (0, 0)));

        let polar_night = local(0, (2020, 11, 1), (12, 0));
        assert_eq!(sun_above_horizon_times(&polar_night, &greenland(), false), None);
    }

    #[test]
    fn test_seasons() {
        let north = new_york();
        let south = Location::new(-33.8688, 151.2093).unwrap();
        let cases = [
            ((2021, 3, 21), Season::Spring, Season::Fall),
            ((2021, 6, 22), Season::Summer, Season::Winter),
            ((2021, 9, 23), Season::Fall, Season::Spring),
            ((2021, 12, 22), Season::Winter, Season::Summer),
            ((2021, 2, 1), Season::Winter, Season::Summer),
        ];
        for (date, northern, southern) in cases {
            let time = local(-5, date, (23, 59));
            assert_eq!(season(&north, &time), northern, "{date:?}");
            assert_eq!(season(&south, &time), southern, "{date:?}");
        }
    }

    #[test]
    fn test_closest_night() {
        let tolerance = Duration::minutes(3);
        let early = local(-4, (2023, 8, 13), (2, 0));
        let night = closest_night(&early, &new_york(), SunTimesMode::Astronomical).unwrap();
        assert!(night.contains(&early));
        assert_eq!(night.end.date_naive(), early.date_naive());

        let evening = local(-4, (2023, 8, 13), (20, 0));
        let night = closest_night(&evening, &new_york(), SunTimesMode::Astronomical).unwrap();
        assert!(night.start > evening);
        assert_within(
            night.start,
            next_sunset(&evening, &new_york(), SunTimesMode::Astronomical, false),
            tolerance,
        );

        let polar_day = local(0, (2020, 6, 4), (12, 0));
        assert_eq!(closest_night(&polar_day, &greenland(), SunTimesMode::Astronomical), None);

        let polar_night = local(0, (2020, 12, 4), (12, 0));
        let night = closest_night(&polar_night, &greenland(), SunTimesMode::Actual).unwrap();
        assert_eq!(night.duration(), Duration::days(1) - Duration::milliseconds(1));
    }

    #[test]
    fn test_solar_longitude_at_equinox() {
        // March equinox 2021-03-20 09:37 UT
        let equinox = local(0, (2021, 3, 20), (9, 37));
        let longitude = solar_longitude(&equinox);
        let distance = longitude.min(360.0 - longitude);
        assert!(distance < 0.05, "{longitude}");
    }
}
