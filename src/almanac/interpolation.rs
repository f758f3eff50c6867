//! Interpolation solver for rise, transit and set (Meeus ch. 15)
//!
//! The body's position is sampled at 0h UT on the day before, of and after
//! the target date. Event times are then refined as fractions `m` of the UT
//! day, interpolating the position at each estimate instead of recomputing
//! it.

use super::{RiseSetTransitTimes, CONVERGENCE_THRESHOLD, MAX_ITERATIONS};
use crate::celestial::CelestialObject;
use crate::coordinates::angle::{acos_deg, cos_deg, normalize_degrees, sin_deg, wrap};
use crate::coordinates::{EquatorialCoordinate, Location};
use crate::positions::{horizon_at_sidereal, ObservationOptions};
use crate::time::sidereal::apparent_sidereal_angle;
use crate::time::{at_local_hour, SiderealTime, UniversalTime};
use crate::units::Distance;
use chrono::{DateTime, Duration, FixedOffset};
use log::{debug, trace, warn};

/// Sidereal degrees turned per solar day
const SIDEREAL_DEGREES_PER_DAY: f64 = 360.985647;

/// Rise, transit and set on the local day of `date` by interpolation alone
///
/// Solutions from the neighbouring days are consulted when the date's own
/// solution lands outside the local day, which happens whenever the local
/// offset shifts 0h UT onto another date. With refraction, events lost
/// because refraction keeps the body above the threshold are filled from a
/// geometric solution.
pub fn rise_set_transit<B: CelestialObject + ?Sized>(
    body: &B,
    date: &DateTime<FixedOffset>,
    location: &Location,
    standard_altitude: f64,
    options: ObservationOptions,
) -> RiseSetTransitTimes {
    let local_date = date.date_naive();
    let on_date = |time: &DateTime<FixedOffset>| time.date_naive() == local_date;

    let today = solve_for_date(body, date, location, standard_altitude, options);
    if [today.rise, today.transit, today.set]
        .iter()
        .all(|event| event.as_ref().is_some_and(on_date))
    {
        return today;
    }

    let candidates = [
        today,
        solve_for_date(body, &at_local_hour(date, 12), location, standard_altitude, options),
        solve_for_date(body, &(*date - Duration::days(1)), location, standard_altitude, options),
        solve_for_date(body, &(*date + Duration::days(1)), location, standard_altitude, options),
    ];
    let pick = |event: fn(&RiseSetTransitTimes) -> Option<DateTime<FixedOffset>>| {
        candidates
            .iter()
            .filter_map(event)
            .find(|time| on_date(time))
    };

    let times = RiseSetTransitTimes::new(
        pick(|times| times.rise),
        pick(|times| times.transit),
        pick(|times| times.set),
    );

    if options.with_refraction && !times.is_complete() {
        let geometric = ObservationOptions {
            with_refraction: false,
            ..options
        };
        return times.or(rise_set_transit(
            body,
            date,
            location,
            standard_altitude,
            geometric,
        ));
    }

    times
}

/// Solve around 0h UT of the local date of `date`
fn solve_for_date<B: CelestialObject + ?Sized>(
    body: &B,
    date: &DateTime<FixedOffset>,
    location: &Location,
    standard_altitude: f64,
    options: ObservationOptions,
) -> RiseSetTransitTimes {
    let ut = UniversalTime::ut0h_on_date(date);
    let times = [ut.plus_days(-1.0), ut, ut.plus_days(1.0)];

    let positions = times.map(|t| body.position_at(&t));
    let distances = if options.with_parallax {
        match times.map(|t| body.distance_at(&t)) {
            [Some(yesterday), Some(today), Some(tomorrow)] => Some([yesterday, today, tomorrow]),
            _ => None,
        }
    } else {
        None
    };

    let Some(fractions) = solve(
        &ut,
        location,
        standard_altitude,
        options.with_refraction,
        &positions,
        distances.as_ref(),
    ) else {
        return RiseSetTransitTimes::default();
    };

    let to_local =
        |m: Option<f64>| m.map(|m| ut.plus_hours(m * 24.0).to_local(date.offset()));
    RiseSetTransitTimes::new(
        to_local(fractions.rise),
        to_local(fractions.transit),
        to_local(fractions.set),
    )
}

/// Converged event times as fractions of the UT day
#[derive(Debug, Clone, Copy, PartialEq)]
struct DayFractions {
    rise: Option<f64>,
    transit: Option<f64>,
    set: Option<f64>,
}

/// Iterate the transit, rise and set estimates of Meeus 15.2
///
/// Returns `None` when the body stays above or below `standard_altitude`
/// all day. An individual event whose correction has not settled after
/// [`MAX_ITERATIONS`] is absent.
fn solve(
    ut: &UniversalTime,
    location: &Location,
    standard_altitude: f64,
    with_refraction: bool,
    positions: &[EquatorialCoordinate; 3],
    distances: Option<&[Distance; 3]>,
) -> Option<DayFractions> {
    let latitude = location.latitude();
    let longitude = location.longitude();
    let declination = positions[1].declination;

    let cos_h = (sin_deg(standard_altitude) - sin_deg(latitude) * sin_deg(declination))
        / (cos_deg(latitude) * cos_deg(declination));
    if cos_h <= -1.0 || cos_h >= 1.0 {
        trace!("cos H0 = {cos_h:.4}, no rise or set");
        return None;
    }
    let h0 = acos_deg(cos_h);

    let sidereal = apparent_sidereal_angle(ut);
    let delta_t = ut.delta_t();
    let right_ascensions = unwrap_right_ascensions(positions);
    let declinations = positions.map(|p| p.declination);

    let transit_guess = wrap(
        (positions[1].right_ascension - longitude - sidereal) / 360.0,
        0.0,
        1.0,
    );
    // Order: transit, rise, set
    let mut m = [
        transit_guess,
        wrap(transit_guess - h0 / 360.0, 0.0, 1.0),
        wrap(transit_guess + h0 / 360.0, 0.0, 1.0),
    ];
    let mut corrections = [f64::INFINITY; 3];

    for iteration in 0..MAX_ITERATIONS {
        for (index, fraction) in m.iter().enumerate() {
            let local_sidereal = SiderealTime::greenwich(
                normalize_degrees(sidereal + SIDEREAL_DEGREES_PER_DAY * fraction) / 15.0,
            )
            .at_longitude(longitude);
            let n = fraction + delta_t / 86_400.0;

            let position = EquatorialCoordinate::new(
                interpolate(n, &declinations),
                interpolate(n, &right_ascensions),
            );
            let hour_angle = position.hour_angle(&local_sidereal) * 15.0;

            corrections[index] = if index == 0 {
                let signed = if hour_angle > 180.0 {
                    hour_angle - 360.0
                } else {
                    hour_angle
                };
                -signed / 360.0
            } else {
                let distance = distances
                    .map(|d| Distance::from_kilometers(interpolate(n, &d.map(|d| d.kilometers()))));
                let altitude = horizon_at_sidereal(
                    &position,
                    &local_sidereal,
                    latitude,
                    with_refraction,
                    distance,
                )
                .altitude;
                let correction = (altitude - standard_altitude)
                    / (360.0
                        * cos_deg(position.declination)
                        * cos_deg(latitude)
                        * sin_deg(hour_angle));
                if correction.is_finite() {
                    correction
                } else {
                    0.0
                }
            };
        }

        for (fraction, correction) in m.iter_mut().zip(corrections) {
            *fraction = wrap(*fraction + correction, 0.0, 1.0);
        }
        trace!("iteration {iteration}: m = {m:?}, dm = {corrections:?}");

        if corrections.iter().all(|c| c.abs() < CONVERGENCE_THRESHOLD) {
            debug!("Rise/set/transit converged after {} iterations", iteration + 1);
            break;
        }
    }

    let converged = corrections.map(|c| c.abs() < CONVERGENCE_THRESHOLD);
    if converged.contains(&false) {
        warn!(
            "Rise/set/transit did not converge in {MAX_ITERATIONS} iterations (transit, rise, set: {converged:?})"
        );
    }
    let settle = |index: usize| converged[index].then_some(m[index]);

    Some(DayFractions {
        rise: settle(1),
        transit: settle(0),
        set: settle(2),
    })
}

/// Right ascensions made increasing across the 0/360 boundary
fn unwrap_right_ascensions(positions: &[EquatorialCoordinate; 3]) -> [f64; 3] {
    let first = positions[0].right_ascension;
    let mut second = positions[1].right_ascension;
    if second < first {
        second += 360.0;
    }
    let mut third = positions[2].right_ascension;
    if third < second {
        third += 360.0;
    }
    [first, second, third]
}

/// Three-point interpolation around the central value (Meeus 3.3)
pub fn interpolate(n: f64, values: &[f64; 3]) -> f64 {
    let a = values[1] - values[0];
    let b = values[2] - values[1];
    let c = b - a;
    values[1] + n / 2.0 * (a + b + n * c)
}
