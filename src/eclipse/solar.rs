//! Solar eclipses seen from a location
//!
//! Every new moon close to a node is a candidate. The apparent discs of
//! the Sun and the Moon, with parallax and refraction, are compared every
//! 15 minutes around the new moon; an overlap while both are above the
//! horizon is then refined into start, peak and end by bisection.

use super::{overlap, Eclipse};
use crate::almanac::search::TimeSearch;
use crate::celestial::lunation::true_phase;
use crate::celestial::{LunationArguments, Moon, Sun};
use crate::constants::DAY_S;
use crate::coordinates::angle::sin_deg;
use crate::coordinates::Location;
use crate::positions::{self, ObservationOptions};
use crate::time::UniversalTime;
use chrono::{DateTime, Duration, FixedOffset};
use log::{debug, trace};

/// New moons with |sin F| above this are too far from a node
const NODE_LIMIT: f64 = 0.36;

const CANDIDATE_STEP_MINUTES: i64 = 15;

/// Samples on each side of the new moon, four hours at 15 minute steps
const CANDIDATE_STEPS: i64 = 16;

/// How far from the first sighting the contacts are looked for
const CONTACT_SEARCH_HOURS: i64 = 12;

/// Apparent discs of the Sun and the Moon at one instant, in degrees
#[derive(Debug, Clone, Copy)]
struct DiscGeometry {
    separation: f64,
    sun_radius: f64,
    moon_radius: f64,
}

impl DiscGeometry {
    /// The discs as seen from `location`, or `None` when either body is
    /// below the horizon
    fn at(ut: &UniversalTime, location: &Location) -> Option<Self> {
        let options = ObservationOptions::new(true, true);
        let sun = positions::observe(&Sun, ut, location, options);
        if sun.altitude < 0.0 {
            return None;
        }
        let moon = positions::observe(&Moon, ut, location, options);
        if moon.altitude < 0.0 {
            return None;
        }
        Some(Self {
            separation: sun.angular_distance_to(&moon),
            sun_radius: Sun.angular_diameter(ut) / 2.0,
            moon_radius: Moon.angular_diameter(ut, moon.altitude) / 2.0,
        })
    }

    fn is_eclipsed(&self) -> bool {
        self.separation < self.sun_radius + self.moon_radius
    }

    /// Fraction of the Sun's diameter covered by the Moon
    ///
    /// Once the Moon is entirely inside the Sun's disc, or covers it, this
    /// is the ratio of the diameters.
    fn magnitude(&self) -> f64 {
        let (rs, rm, d) = (self.sun_radius, self.moon_radius, self.separation);
        if !self.is_eclipsed() {
            0.0
        } else if d <= (rm - rs).abs() {
            rm / rs
        } else {
            (rs + rm - d) / (2.0 * rs)
        }
    }

    /// Fraction of the Sun's area covered by the Moon
    fn obscuration(&self) -> f64 {
        overlap(self.moon_radius, self.sun_radius, self.separation)
    }
}

fn magnitude_at(ut: &UniversalTime, location: &Location) -> f64 {
    DiscGeometry::at(ut, location).map_or(0.0, |discs| discs.magnitude())
}

/// Magnitude of the solar eclipse seen from `location` at `time`, zero
/// when there is none
pub fn solar_eclipse_magnitude(time: &DateTime<FixedOffset>, location: &Location) -> f64 {
    magnitude_at(&UniversalTime::from(time), location)
}

/// Fraction of the Sun hidden by the Moon at `time`
pub fn solar_eclipse_obscuration(time: &DateTime<FixedOffset>, location: &Location) -> f64 {
    DiscGeometry::at(&UniversalTime::from(time), location).map_or(0.0, |discs| discs.obscuration())
}

pub(super) fn next_solar_eclipse(
    after: &DateTime<FixedOffset>,
    location: &Location,
    max_search: Duration,
) -> Option<Eclipse> {
    let after_ut = UniversalTime::from(after);
    let limit = after_ut + max_search + Duration::days(1);
    let search = TimeSearch::new(Duration::minutes(1), 20);
    let contact_window = Duration::hours(CONTACT_SEARCH_HOURS);

    let start_year = (after_ut - Duration::days(2)).decimal_year();
    let mut k = ((start_year - 2000.0) * 12.3685).floor();
    let mut candidates = 0;

    loop {
        let lunation = k;
        k += 1.0;

        let dynamical = UniversalTime::from_julian_day(true_phase(lunation)).ok()?;
        let new_moon = dynamical.plus_days(-dynamical.delta_t() / DAY_S);
        if new_moon > limit {
            debug!("No solar eclipse within the search window after {candidates} candidates");
            return None;
        }
        if sin_deg(LunationArguments::new(lunation).f).abs() > NODE_LIMIT {
            continue;
        }
        candidates += 1;

        let sighting = (-CANDIDATE_STEPS..=CANDIDATE_STEPS)
            .map(|step| new_moon + Duration::minutes(CANDIDATE_STEP_MINUTES * step))
            .map(|ut| (ut, magnitude_at(&ut, location)))
            .filter(|(_, magnitude)| *magnitude > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1));
        let Some((sighting, _)) = sighting else {
            trace!("New moon at {new_moon} is not eclipsed from this location");
            continue;
        };

        let eclipsed = |ut: &UniversalTime| magnitude_at(ut, location) > 0.0;
        let start = search
            .find_start(sighting - contact_window, sighting, eclipsed)
            .unwrap_or(sighting);
        let end = search
            .find_end(sighting, sighting + contact_window, eclipsed)
            .unwrap_or(sighting);
        if end - start < Duration::minutes(1) || end <= after_ut {
            continue;
        }

        let peak = search.find_peak(start, end, |ut| magnitude_at(ut, location));
        let Some(discs) = DiscGeometry::at(&peak, location) else {
            continue;
        };

        debug!("Solar eclipse found at {peak} after {candidates} candidates");
        let offset = after.offset();
        return Some(Eclipse {
            start: start.to_local(offset),
            peak: peak.to_local(offset),
            end: end.to_local(offset),
            magnitude: discs.magnitude(),
            obscuration: discs.obscuration(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astronomy::test_support::{assert_within, local};
    use approx::assert_abs_diff_eq;

    fn massachusetts() -> Location {
        Location::new(42.0, -70.0).unwrap()
    }

    fn five_years() -> Duration {
        Duration::days(5 * 365)
    }

    #[test]
    fn test_partial_solar_eclipses() {
        let tolerance = Duration::minutes(4);
        let cases = [
            (
                (2023, 1, 1),
                [((2023, 10, 14), (16, 22)), ((2023, 10, 14), (17, 29)), ((2023, 10, 14), (18, 35))],
                0.275,
                0.163,
            ),
            (
                (2023, 10, 15),
                [((2024, 4, 8), (18, 18)), ((2024, 4, 8), (19, 31)), ((2024, 4, 8), (20, 40))],
                0.909,
                0.897,
            ),
            // Already in progress at sunrise
            (
                (2024, 4, 9),
                [((2025, 3, 29), (10, 29)), ((2025, 3, 29), (10, 29)), ((2025, 3, 29), (11, 8))],
                0.692,
                0.621,
            ),
        ];
        for (date, [start, peak, end], magnitude, obscuration) in cases {
            let eclipse =
                next_solar_eclipse(&local(0, date, (0, 0)), &massachusetts(), five_years()).unwrap();
            assert_within(local(0, start.0, start.1), Some(eclipse.start), tolerance);
            assert_within(local(0, peak.0, peak.1), Some(eclipse.peak), tolerance);
            assert_within(local(0, end.0, end.1), Some(eclipse.end), tolerance);
            assert_abs_diff_eq!(eclipse.magnitude, magnitude, epsilon = 0.02);
            assert_abs_diff_eq!(eclipse.obscuration, obscuration, epsilon = 0.02);
        }
    }

    #[test]
    fn test_total_solar_eclipse() {
        let durango = Location::new(25.28, -104.12).unwrap();
        let eclipse =
            next_solar_eclipse(&local(0, (2023, 10, 15), (0, 0)), &durango, five_years()).unwrap();
        let tolerance = Duration::minutes(5);
        assert_within(local(0, (2024, 4, 8), (16, 59)), Some(eclipse.start), tolerance);
        assert_within(local(0, (2024, 4, 8), (18, 17)), Some(eclipse.peak), tolerance);
        assert_within(local(0, (2024, 4, 8), (19, 40)), Some(eclipse.end), tolerance);
        assert!(eclipse.magnitude > 1.0);
        assert_eq!(eclipse.obscuration, 1.0);
    }

    #[test]
    fn test_no_visible_eclipse() {
        let china = Location::new(40.0, 120.0).unwrap();
        for date in [(2023, 1, 1), (2023, 10, 15)] {
            assert_eq!(next_solar_eclipse(&local(0, date, (0, 0)), &china, five_years()), None);
        }
    }

    #[test]
    fn test_search_window_limits_the_result() {
        let after = local(0, (2023, 1, 1), (0, 0));
        assert_eq!(next_solar_eclipse(&after, &massachusetts(), Duration::days(90)), None);
    }

    #[test]
    fn test_eclipse_in_progress_is_returned() {
        let tolerance = Duration::minutes(4);
        let eclipse =
            next_solar_eclipse(&local(0, (2023, 10, 14), (18, 0)), &massachusetts(), five_years())
                .unwrap();
        assert_within(local(0, (2023, 10, 14), (16, 22)), Some(eclipse.start), tolerance);
        assert_within(local(0, (2023, 10, 14), (18, 35)), Some(eclipse.end), tolerance);
    }

    #[test]
    fn test_magnitude_at_a_time() {
        let location = massachusetts();
        let during = local(0, (2024, 4, 8), (19, 31));
        assert_abs_diff_eq!(solar_eclipse_magnitude(&during, &location), 0.909, epsilon = 0.02);
        assert_abs_diff_eq!(solar_eclipse_obscuration(&during, &location), 0.897, epsilon = 0.02);

        let before = local(0, (2024, 4, 8), (12, 0));
        assert_eq!(solar_eclipse_magnitude(&before, &location), 0.0);
        assert_eq!(solar_eclipse_obscuration(&before, &location), 0.0);
    }

    #[test]
    fn test_annular_geometry() {
        let annular = DiscGeometry {
            separation: 0.01,
            sun_radius: 0.27,
            moon_radius: 0.25,
        };
        assert_abs_diff_eq!(annular.magnitude(), 0.25 / 0.27, epsilon = 1e-12);
        assert_abs_diff_eq!(annular.obscuration(), (0.25f64 / 0.27).powi(2), epsilon = 1e-12);

        let apart = DiscGeometry {
            separation: 0.6,
            ..annular
        };
        assert_eq!(apart.magnitude(), 0.0);
        assert_eq!(apart.obscuration(), 0.0);
    }
}
