use super::{above_horizon_times, closest_future_time, TimeWindow};
use crate::almanac::{self, RiseSetTransitTimes};
use crate::celestial::lunation::true_phase;
use crate::celestial::{Moon, MoonPhase, MoonTruePhase};
use crate::constants::DAY_S;
use crate::coordinates::angle::delta_angle;
use crate::coordinates::Location;
use crate::positions::{self, ObservationOptions};
use crate::time::UniversalTime;
use crate::units::Distance;
use crate::Result;
use chrono::{DateTime, Duration, FixedOffset};

/// Altitude of the Moon's center at moonrise and moonset
///
/// Accounts for the mean horizontal parallax, semi-diameter and refraction.
pub const MOON_STANDARD_ALTITUDE: f64 = 0.125;

/// Moonrise, transit and moonset on the local day of `date`
pub fn moon_events(
    date: &DateTime<FixedOffset>,
    location: &Location,
    with_refraction: bool,
) -> RiseSetTransitTimes {
    almanac::rise_set_transit(
        &Moon,
        date,
        location,
        MOON_STANDARD_ALTITUDE,
        ObservationOptions::new(with_refraction, false),
    )
}

/// Topocentric altitude of the Moon in degrees
pub fn moon_altitude(time: &DateTime<FixedOffset>, location: &Location, with_refraction: bool) -> f64 {
    positions::altitude(
        &Moon,
        &UniversalTime::from(time),
        location,
        ObservationOptions::new(with_refraction, true),
    )
}

/// Topocentric azimuth of the Moon in degrees
pub fn moon_azimuth(time: &DateTime<FixedOffset>, location: &Location) -> f64 {
    positions::azimuth(
        &Moon,
        &UniversalTime::from(time),
        location,
        ObservationOptions::new(false, true),
    )
}

pub fn next_moonrise(
    time: &DateTime<FixedOffset>,
    location: &Location,
    with_refraction: bool,
) -> Option<DateTime<FixedOffset>> {
    let today = moon_events(time, location, with_refraction);
    let tomorrow = moon_events(&(*time + Duration::days(1)), location, with_refraction);
    closest_future_time(time, &[today.rise, tomorrow.rise])
}

pub fn next_moonset(
    time: &DateTime<FixedOffset>,
    location: &Location,
    with_refraction: bool,
) -> Option<DateTime<FixedOffset>> {
    let today = moon_events(time, location, with_refraction);
    let tomorrow = moon_events(&(*time + Duration::days(1)), location, with_refraction);
    closest_future_time(time, &[today.set, tomorrow.set])
}

pub fn is_moon_up(time: &DateTime<FixedOffset>, location: &Location, with_refraction: bool) -> bool {
    moon_altitude(time, location, with_refraction) > 0.0
}

/// Distance between the centers of Earth and the Moon
pub fn moon_distance(time: &DateTime<FixedOffset>) -> Distance {
    let ut = UniversalTime::from(time);
    Moon.distance_at(ut.terrestrial_centuries())
}

pub fn moon_phase(time: &DateTime<FixedOffset>) -> MoonPhase {
    Moon.phase(&UniversalTime::from(time))
}

pub fn is_super_moon(time: &DateTime<FixedOffset>) -> bool {
    Moon.is_super_moon(&UniversalTime::from(time))
}

/// The moonlit window around `time`
pub fn moon_above_horizon_times(
    time: &DateTime<FixedOffset>,
    location: &Location,
    with_refraction: bool,
) -> Option<TimeWindow> {
    above_horizon_times(time, is_moon_up(time, location, with_refraction), |date| {
        moon_events(date, location, with_refraction)
    })
}

/// Rotation of the bright limb from the observer's vertical, in degrees
///
/// Zero when the lit side faces straight up, positive when it is turned
/// clockwise as seen by the observer.
pub fn moon_tilt(time: &DateTime<FixedOffset>, location: &Location) -> f64 {
    let ut = UniversalTime::from(time);
    let limb = Moon.bright_limb_position_angle(&ut);
    let parallactic = positions::parallactic_angle(&Moon, &ut, location);
    delta_angle(0.0, limb - parallactic)
}

pub fn moon_parallactic_angle(time: &DateTime<FixedOffset>, location: &Location) -> f64 {
    positions::parallactic_angle(&Moon, &UniversalTime::from(time), location)
}

/// The first instant after `time` at which the Moon reaches `phase`
///
/// Principal phases are exact to about a minute; the intermediate ones
/// are their mean instants.
pub fn next_moon_phase(
    time: &DateTime<FixedOffset>,
    phase: MoonTruePhase,
) -> Result<DateTime<FixedOffset>> {
    let ut = UniversalTime::from(time);
    let instant = |k: f64| -> Result<UniversalTime> {
        let dynamical = UniversalTime::from_julian_day(true_phase(k))?;
        Ok(dynamical.plus_days(-dynamical.delta_t() / DAY_S))
    };

    // The lunation estimate can be off by one near the phase itself
    let mut k = Moon::next_phase_k(&ut, phase);
    while instant(k - 1.0)? > ut {
        k -= 1.0;
    }
    while instant(k)? <= ut {
        k += 1.0;
    }
    Ok(instant(k)?.to_local(time.offset()))
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
    fn test_moon_events() {
        let tolerance = Duration::minutes(2);
        let events = moon_events(&local(-4, (2020, 9, 12), (12, 0)), &new_york(), false);
        assert_within(local(-4, (2020, 9, 12), (0, 46)), events.rise, tolerance);
        assert_within(local(-4, (2020, 9, 12), (8, 34)), events.transit, tolerance);
        assert_within(local(-4, (2020, 9, 12), (16, 21)), events.set, tolerance);

        let events = moon_events(&local(-4, (2020, 9, 11), (12, 0)), &new_york(), false);
        assert_eq!(events.rise, None);
        assert_within(local(-4, (2020, 9, 11), (15, 27)), events.set, tolerance);
    }

    #[test]
    fn test_next_moonrise_and_moonset() {
        let tolerance = Duration::minutes(2);
        let location = new_york();
        assert_within(
            local(-4, (2020, 9, 13), (17, 10)),
            next_moonset(&local(-4, (2020, 9, 13), (9, 0)), &location, false),
            tolerance,
        );
        assert_within(
            local(-4, (2020, 9, 14), (17, 53)),
            next_moonset(&local(-4, (2020, 9, 13), (20, 0)), &location, false),
            tolerance,
        );
        assert_within(
            local(-4, (2020, 9, 13), (1, 45)),
            next_moonrise(&local(-4, (2020, 9, 13), (0, 0)), &location, false),
            tolerance,
        );
        assert_within(
            local(-4, (2020, 9, 14), (2, 51)),
            next_moonrise(&local(-4, (2020, 9, 13), (2, 0)), &location, false),
            tolerance,
        );
    }

    #[test]
    fn test_is_moon_up() {
        assert!(is_moon_up(&local(-4, (2020, 9, 13), (9, 8)), &new_york(), false));
        assert!(!is_moon_up(&local(-4, (2020, 9, 13), (21, 58)), &new_york(), false));
    }

    #[test]
    fn test_moon_phases() {
        let cases = [
            (local(-5, (2020, 3, 2), (14, 58)), MoonTruePhase::FirstQuarter, 50.0),
            (local(-5, (2020, 3, 9), (13, 48)), MoonTruePhase::Full, 100.0),
            (local(-4, (2020, 3, 16), (5, 35)), MoonTruePhase::ThirdQuarter, 50.0),
            (local(-4, (2020, 3, 24), (5, 29)), MoonTruePhase::New, 0.0),
            (local(-4, (2020, 3, 29), (12, 0)), MoonTruePhase::WaxingCrescent, 23.0),
            (local(-5, (2020, 3, 5), (12, 0)), MoonTruePhase::WaxingGibbous, 79.0),
            (local(-4, (2020, 3, 13), (12, 0)), MoonTruePhase::WaningGibbous, 79.0),
            (local(-4, (2020, 3, 18), (12, 0)), MoonTruePhase::WaningCrescent, 28.0),
        ];
        for (time, phase, illumination) in cases {
            let actual = moon_phase(&time);
            assert_eq!(actual.phase, phase, "{time}");
            assert_abs_diff_eq!(actual.illumination, illumination, epsilon = 0.5);
        }
    }

    #[test]
    fn test_super_moon() {
        assert!(is_super_moon(&local(0, (2021, 4, 26), (12, 0))));
        assert!(!is_super_moon(&local(0, (2021, 4, 21), (12, 0))));
        assert!(!is_super_moon(&local(0, (2021, 9, 21), (12, 0))));
    }

    #[test]
    fn test_moon_distance() {
        let distance = moon_distance(&local(0, (1992, 4, 12), (0, 0)));
        assert_abs_diff_eq!(distance.kilometers(), 368_409.0, epsilon = 1.0);
    }

    #[test]
    fn test_above_horizon_window() {
        let tolerance = Duration::minutes(2);
        let window = moon_above_horizon_times(&local(-4, (2020, 9, 12), (12, 0)), &new_york(), false)
            .unwrap();
        assert_within(local(-4, (2020, 9, 12), (0, 46)), Some(window.start), tolerance);
        assert_within(local(-4, (2020, 9, 12), (16, 21)), Some(window.end), tolerance);

        let window = moon_above_horizon_times(&local(-4, (2020, 9, 11), (17, 0)), &new_york(), false)
            .unwrap();
        assert_within(local(-4, (2020, 9, 10), (23, 55)), Some(window.start), tolerance);
        assert_within(local(-4, (2020, 9, 11), (15, 27)), Some(window.end), tolerance);

        let circumpolar = local(0, (2020, 9, 11), (0, 0));
        let window = moon_above_horizon_times(&circumpolar, &greenland(), false).unwrap();
        assert_eq!(window.start, circumpolar);

        let below = local(0, (2020, 9, 24), (0, 0));
        assert_eq!(moon_above_horizon_times(&below, &greenland(), false), None);
    }

    #[test]
    fn test_moon_tilt() {
        let cases = [
            (0.0, 0.0, local(0, (2020, 9, 13), (12, 0)), -3.4),
            (42.0, -72.0, local(0, (2024, 10, 25), (0, 0)), 113.6),
            (-60.0, 180.0, local(0, (2024, 10, 25), (0, 0)), -43.1),
        ];
        for (latitude, longitude, time, expected) in cases {
            let location = Location::new(latitude, longitude).unwrap();
            assert_abs_diff_eq!(moon_tilt(&time, &location), expected, epsilon = 0.5);
        }
    }

    #[test]
    fn test_next_moon_phase() {
        let tolerance = Duration::minutes(2);
        let start = local(0, (2020, 3, 1), (0, 0));
        assert_within(
            local(0, (2020, 3, 9), (17, 48)),
            next_moon_phase(&start, MoonTruePhase::Full).ok(),
            tolerance,
        );
        // The lunation estimate lands on April, the phase is still ahead in March
        assert_within(
            local(0, (2020, 3, 2), (19, 57)),
            next_moon_phase(&start, MoonTruePhase::FirstQuarter).ok(),
            tolerance,
        );
        assert_within(
            local(0, (2020, 3, 24), (9, 28)),
            next_moon_phase(&local(0, (2020, 3, 10), (0, 0)), MoonTruePhase::New).ok(),
            tolerance,
        );

        let full = next_moon_phase(&start, MoonTruePhase::Full).unwrap();
        let following = next_moon_phase(&full, MoonTruePhase::Full).unwrap();
        assert!((following - full).num_days() >= 29);
    }
}
