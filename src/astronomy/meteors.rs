use super::sun::{closest_night, solar_longitude, solar_longitude_at};
use super::{closest_future_time, closest_past_time, closest_time, TimeWindow};
use crate::almanac::{interpolation, RiseSetTransitTimes, SunTimesMode};
use crate::celestial::MeteorShower;
use crate::coordinates::angle::{delta_angle, sin_deg};
use crate::coordinates::Location;
use crate::positions::{self, ObservationOptions};
use crate::time::{start_of_local_day, UniversalTime};
use chrono::{DateTime, Duration, FixedOffset};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Solar longitude distance, in degrees, within which a shower may peak today
const PEAK_LONGITUDE_WINDOW: f64 = 2.0;

/// Days of solar motion per degree of longitude, roughly
const DAYS_PER_DEGREE: f64 = 58.0;

const LONGITUDE_ITERATIONS: usize = 20;

/// Step of the altitude scan for radiants that never cross the meridian
/// in darkness
const SCAN_STEP_MINUTES: i64 = 5;

/// The best viewing of a shower on its peak night
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeteorShowerPeak {
    pub shower: MeteorShower,
    /// Radiant rise or nightfall, whichever is later
    pub start: DateTime<FixedOffset>,
    /// Highest radiant in darkness
    pub peak: DateTime<FixedOffset>,
    /// Radiant set or daybreak, whichever is earlier
    pub end: DateTime<FixedOffset>,
}

/// The shower that peaks on the local date of `date`, if any
pub fn meteor_shower(location: &Location, date: &DateTime<FixedOffset>) -> Option<MeteorShowerPeak> {
    let start_of_day = start_of_local_day(date);
    let longitude = solar_longitude(date);

    MeteorShower::ALL
        .into_iter()
        .filter(|shower| delta_angle(longitude, shower.solar_longitude()).abs() <= PEAK_LONGITUDE_WINDOW)
        .filter_map(|shower| next_peak(shower, location, &start_of_day))
        .find(|peak| peak.peak.date_naive() == date.date_naive())
}

/// Showers whose activity window covers `date`, in order of their peaks
///
/// The time of day is not considered, so a shower may be active but below
/// the horizon.
pub fn active_meteor_showers(location: &Location, date: &DateTime<FixedOffset>) -> Vec<MeteorShowerPeak> {
    let search_days = MeteorShower::ALL
        .iter()
        .map(|shower| shower.active_days())
        .max()
        .unwrap_or_default() as i64;

    let mut active: Vec<MeteorShowerPeak> = Vec::new();
    for day in -search_days..search_days {
        let Some(peak) = meteor_shower(location, &(*date + Duration::days(day))) else {
            continue;
        };
        let half_window = Duration::days(peak.shower.active_days() as i64 / 2);
        if (peak.peak - *date).abs() <= half_window && !active.contains(&peak) {
            active.push(peak);
        }
    }
    active
}

/// Altitude of a shower's radiant in degrees, without refraction
pub fn meteor_shower_altitude(
    shower: MeteorShower,
    time: &DateTime<FixedOffset>,
    location: &Location,
) -> f64 {
    positions::altitude(
        &shower,
        &UniversalTime::from(time),
        location,
        ObservationOptions::default(),
    )
}

pub fn meteor_shower_azimuth(
    shower: MeteorShower,
    time: &DateTime<FixedOffset>,
    location: &Location,
) -> f64 {
    positions::azimuth(
        &shower,
        &UniversalTime::from(time),
        location,
        ObservationOptions::default(),
    )
}

/// The peak night following `now`
fn next_peak(
    shower: MeteorShower,
    location: &Location,
    now: &DateTime<FixedOffset>,
) -> Option<MeteorShowerPeak> {
    let time = next_time_at_solar_longitude(shower.solar_longitude(), now)?;
    let days = [
        radiant_times(shower, &(time - Duration::days(1)), location),
        radiant_times(shower, &time, location),
        radiant_times(shower, &(time + Duration::days(1)), location),
    ];

    let transit = closest_time(&time, &days.map(|day| day.transit));
    let reference = transit.unwrap_or(time);
    let rise = closest_past_time(&reference, &days.map(|day| day.rise));
    let set = closest_future_time(&reference, &days.map(|day| day.set));

    let night = closest_night(&reference, location, SunTimesMode::Astronomical)?;

    let Some(transit) = transit else {
        // Circumpolar or never up: take the highest point of the night
        let peak = highest_in_window(shower, &night, location)?;
        return Some(MeteorShowerPeak {
            shower,
            start: night.start,
            peak,
            end: night.end,
        });
    };

    let visible = TimeWindow::new(rise.unwrap_or(night.start), set.unwrap_or(night.end));
    let dark = visible.intersection(&night)?;
    Some(MeteorShowerPeak {
        shower,
        start: dark.start,
        peak: dark.clamp(transit),
        end: dark.end,
    })
}

fn radiant_times(
    shower: MeteorShower,
    date: &DateTime<FixedOffset>,
    location: &Location,
) -> RiseSetTransitTimes {
    // A radiant without rise, set or transit on a day is expected, so the
    // hourly scan fallback is not needed
    interpolation::rise_set_transit(&shower, date, location, 0.0, ObservationOptions::default())
}

/// The scanned time of highest altitude, if the radiant is ever up
fn highest_in_window(
    shower: MeteorShower,
    window: &TimeWindow,
    location: &Location,
) -> Option<DateTime<FixedOffset>> {
    let step = Duration::minutes(SCAN_STEP_MINUTES);
    let mut best: Option<(DateTime<FixedOffset>, f64)> = None;
    let mut current = window.start;
    while current < window.end {
        let altitude = meteor_shower_altitude(shower, &current, location);
        if best.map_or(true, |(_, highest)| altitude > highest) {
            best = Some((current, altitude));
        }
        current += step;
    }
    best.filter(|(_, altitude)| *altitude >= 0.0).map(|(time, _)| time)
}

/// The instant at which the Sun next reaches `longitude`, within a year
fn next_time_at_solar_longitude(
    longitude: f64,
    today: &DateTime<FixedOffset>,
) -> Option<DateTime<FixedOffset>> {
    let start = UniversalTime::from(today);
    let approximate = (0..=365)
        .map(|day| start.plus_days(day as f64))
        .find(|ut| delta_angle(longitude, solar_longitude_at(ut)).abs() < 1.0)
        .unwrap_or(start);

    let mut jd = approximate.julian_day();
    for iteration in 0..LONGITUDE_ITERATIONS {
        let ut = UniversalTime::from_julian_day(jd).ok()?;
        let correction = DAYS_PER_DEGREE * sin_deg(longitude - solar_longitude_at(&ut));
        jd += correction;
        if correction.abs() <= 0.00001 {
            debug!("Solar longitude {longitude} reached after {} iterations", iteration + 1);
            let ut = UniversalTime::from_julian_day(jd).ok()?;
            return Some(ut.to_local(today.offset()));
        }
    }

    warn!("Solar longitude {longitude} did not converge in {LONGITUDE_ITERATIONS} iterations");
    let ut = UniversalTime::from_julian_day(jd).ok()?;
    Some(ut.to_local(today.offset()))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{assert_within, local};
    use super::*;
    use approx::assert_abs_diff_eq;

    fn new_york() -> Location {
        Location::new(40.7128, -74.0060).unwrap()
    }

    #[test]
    fn test_meteor_shower_peaks() {
        let cases = [
            (-5, (2023, 1, 4), MeteorShower::Quadrantids, ((1, 4), (5, 39))),
            (-4, (2023, 4, 22), MeteorShower::Lyrids, ((4, 22), (4, 26))),
            (-4, (2023, 5, 6), MeteorShower::EtaAquariids, ((5, 6), (4, 1))),
            (-4, (2023, 7, 30), MeteorShower::DeltaAquariids, ((7, 30), (3, 7))),
            (-4, (2023, 8, 13), MeteorShower::Perseids, ((8, 13), (4, 17))),
            (-4, (2023, 10, 21), MeteorShower::Orionids, ((10, 21), (5, 18))),
            (-5, (2023, 11, 17), MeteorShower::Leonids, ((11, 17), (5, 9))),
            (-5, (2023, 12, 14), MeteorShower::Geminids, ((12, 14), (1, 49))),
            (-5, (2023, 12, 23), MeteorShower::Ursids, ((12, 23), (5, 36))),
        ];
        for (offset, date, shower, ((month, day), time)) in cases {
            let peak = meteor_shower(&new_york(), &local(offset, date, (0, 0)))
                .unwrap_or_else(|| panic!("no shower on {date:?}"));
            assert_eq!(peak.shower, shower);
            assert_within(local(offset, (date.0, month, day), time), Some(peak.peak), Duration::minutes(10));
            assert!(peak.start <= peak.peak && peak.peak <= peak.end);
        }
    }

    #[test]
    fn test_peak_is_bounded_by_darkness() {
        let peak = meteor_shower(&new_york(), &local(-4, (2023, 4, 22), (0, 0))).unwrap();
        let tolerance = Duration::minutes(5);
        // The Lyrid radiant is up all night and transits after daybreak
        assert_within(local(-4, (2023, 4, 21), (21, 22)), Some(peak.start), tolerance);
        assert_within(local(-4, (2023, 4, 22), (4, 26)), Some(peak.end), tolerance);
    }

    #[test]
    fn test_no_shower() {
        assert_eq!(meteor_shower(&new_york(), &local(-5, (2023, 1, 1), (0, 0))), None);
        assert_eq!(meteor_shower(&new_york(), &local(-5, (2023, 12, 22), (0, 0))), None);
    }

    #[test]
    fn test_active_meteor_showers() {
        use MeteorShower::*;
        let cases: [(i32, (i32, u32, u32), u32, &[MeteorShower]); 8] = [
            (-5, (2023, 6, 1), 0, &[]),
            (-5, (2022, 12, 26), 5, &[Ursids, Quadrantids]),
            (-5, (2022, 12, 25), 5, &[Ursids]),
            (-5, (2023, 1, 14), 5, &[Quadrantids]),
            (-5, (2023, 1, 15), 5, &[]),
            (-4, (2023, 4, 22), 5, &[Lyrids, EtaAquariids]),
            (-4, (2023, 7, 31), 3, &[DeltaAquariids, Perseids]),
            (-5, (2023, 12, 22), 5, &[Geminids, Ursids]),
        ];
        for (offset, date, hour, expected) in cases {
            let active = active_meteor_showers(&new_york(), &local(offset, date, (hour, 0)));
            let showers: Vec<MeteorShower> = active.iter().map(|peak| peak.shower).collect();
            assert_eq!(showers, expected, "{date:?}");
        }
    }

    #[test]
    fn test_radiant_position() {
        // Perseid radiant at the peak, well up in the northeast
        let time = local(-4, (2023, 8, 13), (4, 0));
        let altitude = meteor_shower_altitude(MeteorShower::Perseids, &time, &new_york());
        let azimuth = meteor_shower_azimuth(MeteorShower::Perseids, &time, &new_york());
        assert!(altitude > 35.0, "{altitude}");
        assert!((0.0..90.0).contains(&azimuth), "{azimuth}");
    }

    #[test]
    fn test_solar_longitude_search() {
        let start = local(0, (2023, 12, 1), (0, 0));
        let time = next_time_at_solar_longitude(270.0, &start).unwrap();
        assert_abs_diff_eq!(solar_longitude(&time), 270.0, epsilon = 0.001);
        // December solstice 2023: 12-22 03:27 UT
        assert_within(local(0, (2023, 12, 22), (3, 27)), Some(time), Duration::minutes(10));
    }
}
