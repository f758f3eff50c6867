use crate::almanac::{self, RiseSetTransitTimes};
use crate::celestial::{CelestialObject, Star};
use crate::coordinates::angle::{clamp_latitude, delta_angle};
use crate::coordinates::{EquatorialCoordinate, HorizonCoordinate, Location};
use crate::planetlib::Planet;
use crate::positions::{self, ObservationOptions};
use crate::time::{SiderealTime, UniversalTime};
use crate::units::Distance;
use chrono::{DateTime, FixedOffset};
use log::{debug, trace, warn};
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

/// Grid spacing in degrees when no approximate location is known
const GLOBAL_GRID_STEP: f64 = 5.0;

/// Half width in degrees of the grid around an approximate location
const LOCAL_GRID_RADIUS: f64 = 15.0;

const FIX_MAX_ITERATIONS: usize = 50;

/// Gauss-Newton steps below this many degrees end the fix
const FIX_CONVERGENCE: f64 = 1e-7;

/// Finite-difference step in degrees for altitude derivatives
const DERIVATIVE_STEP: f64 = 1e-5;

/// Catalog stars further below the horizon than this are not matched
const PLATE_MIN_ALTITUDE: f64 = -10.0;

/// Width in degrees of the neighbor windows catalog quads are built from
const PLATE_WINDOW: f64 = 60.0;

/// Where a planet is and how it looks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CelestialObservation {
    pub azimuth: f64,
    pub altitude: f64,
    /// Apparent diameter of the disc in degrees
    pub angular_diameter: f64,
    /// Apparent visual magnitude
    pub magnitude: f64,
    pub distance: Distance,
}

/// Topocentric position and appearance of a planet
///
/// Earth itself cannot be observed and yields `None`.
pub fn planet_position(
    planet: Planet,
    time: &DateTime<FixedOffset>,
    location: &Location,
    with_refraction: bool,
) -> Option<CelestialObservation> {
    if !planet.is_observable() {
        return None;
    }
    let ut = UniversalTime::from(time);
    let horizon = positions::observe(
        &planet,
        &ut,
        location,
        ObservationOptions::new(with_refraction, true),
    );
    Some(CelestialObservation {
        azimuth: horizon.azimuth,
        altitude: horizon.altitude,
        angular_diameter: planet.angular_diameter(&ut)?,
        magnitude: planet.magnitude(&ut)?,
        distance: planet.distance_at(&ut)?,
    })
}

/// Rise, transit and set of a planet's center across the horizon
///
/// Earth has no events.
pub fn planet_events(
    planet: Planet,
    date: &DateTime<FixedOffset>,
    location: &Location,
    with_refraction: bool,
) -> RiseSetTransitTimes {
    if !planet.is_observable() {
        return RiseSetTransitTimes::default();
    }
    almanac::rise_set_transit(
        &planet,
        date,
        location,
        0.0,
        ObservationOptions::new(with_refraction, false),
    )
}

pub fn star_position(
    star: &Star,
    time: &DateTime<FixedOffset>,
    location: &Location,
    with_refraction: bool,
) -> HorizonCoordinate {
    positions::observe(
        star,
        &UniversalTime::from(time),
        location,
        ObservationOptions::new(with_refraction, false),
    )
}

pub fn star_events(
    star: &Star,
    date: &DateTime<FixedOffset>,
    location: &Location,
    with_refraction: bool,
) -> RiseSetTransitTimes {
    almanac::rise_set_transit(
        star,
        date,
        location,
        0.0,
        ObservationOptions::new(with_refraction, false),
    )
}

/// Color temperature of a star in kelvin from its B-V index (Ballesteros 2012)
pub fn star_color_temperature(star: &Star) -> f64 {
    let bv = 0.92 * star.color_index;
    4600.0 * (1.0 / (bv + 1.7) + 1.0 / (bv + 0.62))
}

/// Radius of the circle of equal altitude on Earth's surface, one nautical
/// mile per arcminute of zenith distance
pub fn zenith_distance(altitude: f64) -> Distance {
    Distance::from_nautical_miles((90.0 - altitude) * 60.0)
}

/// The point on Earth where `star` is at the zenith at `time`
pub fn substellar_point(star: &Star, time: &DateTime<FixedOffset>) -> Location {
    let ut = UniversalTime::from(time);
    let position = star.position_at(&ut);
    Location::constrained(
        position.declination,
        position.right_ascension - ut.to_sidereal_time().degrees(),
    )
}

/// A measured altitude of a catalog star
#[derive(Debug, Clone, PartialEq)]
pub struct StarAltitudeReading {
    pub star: Star,
    /// Observed altitude in degrees, refraction included
    pub altitude: f64,
    pub time: DateTime<FixedOffset>,
}

impl StarAltitudeReading {
    pub fn new(star: Star, altitude: f64, time: DateTime<FixedOffset>) -> Self {
        Self {
            star,
            altitude,
            time,
        }
    }
}

/// A reading prepared for repeated evaluation at trial locations
struct Sight {
    position: EquatorialCoordinate,
    greenwich: SiderealTime,
    altitude: f64,
    weight: f64,
}

impl Sight {
    /// Weighted observed minus computed altitude at a trial location
    fn residual(&self, latitude: f64, longitude: f64) -> f64 {
        let computed = positions::horizon_at_sidereal(
            &self.position,
            &self.greenwich.at_longitude(longitude),
            clamp_latitude(latitude),
            true,
            None,
        );
        self.weight * (self.altitude - computed.altitude)
    }
}

/// Observer location from measured altitudes of known stars
///
/// Each reading puts the observer on a circle of equal altitude around the
/// star's substellar point. The best grid point, global or around
/// `approximate`, is refined by weighted Gauss-Newton least squares, with
/// stars near the zenith weighted most. Needs at least two readings; with
/// only two the circles cross twice and `approximate` picks the crossing.
pub fn location_from_stars(
    readings: &[StarAltitudeReading],
    approximate: Option<&Location>,
) -> Option<Location> {
    if readings.len() < 2 {
        return None;
    }

    let raw: Vec<f64> = readings
        .iter()
        .map(|reading| 1.0 / (90.0 - reading.altitude).max(1.0))
        .collect();
    let norm = raw.iter().map(|w| w * w).sum::<f64>().sqrt();
    let sights: Vec<Sight> = readings
        .iter()
        .zip(&raw)
        .map(|(reading, weight)| {
            let ut = UniversalTime::from(&reading.time);
            Sight {
                position: reading.star.position_at(&ut),
                greenwich: ut.to_sidereal_time(),
                altitude: reading.altitude,
                weight: weight / norm,
            }
        })
        .collect();
    let cost = |(latitude, longitude): (f64, f64)| -> f64 {
        sights
            .iter()
            .map(|sight| sight.residual(latitude, longitude).powi(2))
            .sum()
    };

    let grid: Vec<(f64, f64)> = match approximate {
        Some(center) => {
            let steps = LOCAL_GRID_RADIUS as i32;
            (-steps..=steps)
                .flat_map(|i| (-steps..=steps).map(move |j| (i as f64, j as f64)))
                .map(|(i, j)| {
                    (
                        clamp_latitude(center.latitude() + i),
                        center.longitude() + j,
                    )
                })
                .collect()
        }
        None => {
            let rows = (180.0 / GLOBAL_GRID_STEP) as i32;
            let columns = (360.0 / GLOBAL_GRID_STEP) as i32;
            (0..=rows)
                .flat_map(|i| (0..columns).map(move |j| (i, j)))
                .map(|(i, j)| {
                    (
                        -90.0 + i as f64 * GLOBAL_GRID_STEP,
                        -180.0 + j as f64 * GLOBAL_GRID_STEP,
                    )
                })
                .collect()
        }
    };
    let (mut latitude, mut longitude) = grid
        .into_iter()
        .min_by(|a, b| cost(*a).total_cmp(&cost(*b)))?;

    let mut converged = false;
    for iteration in 0..FIX_MAX_ITERATIONS {
        let mut normal = Matrix2::zeros();
        let mut gradient = Vector2::zeros();
        for sight in &sights {
            let residual = sight.residual(latitude, longitude);
            // Derivatives of the computed altitude, the negated residual slope
            let slope = Vector2::new(
                sight.residual(latitude - DERIVATIVE_STEP, longitude)
                    - sight.residual(latitude + DERIVATIVE_STEP, longitude),
                sight.residual(latitude, longitude - DERIVATIVE_STEP)
                    - sight.residual(latitude, longitude + DERIVATIVE_STEP),
            ) / (2.0 * DERIVATIVE_STEP);
            normal += slope * slope.transpose();
            gradient += slope * residual;
        }

        let Some(inverse) = normal.try_inverse() else {
            warn!("Star fix is degenerate at {latitude:.4}, {longitude:.4}");
            break;
        };
        let step = inverse * gradient;
        latitude = clamp_latitude(latitude + step.x);
        longitude = delta_angle(0.0, longitude + step.y);
        trace!("Star fix iteration {iteration}: {latitude:.6}, {longitude:.6}");

        if step.norm() < FIX_CONVERGENCE {
            debug!("Star fix converged after {} iterations", iteration + 1);
            converged = true;
            break;
        }
    }
    if !converged {
        warn!("Star fix stopped without converging after {FIX_MAX_ITERATIONS} iterations");
    }

    Location::new(latitude, delta_angle(0.0, longitude)).ok()
}

/// Matching parameters for [`plate_solve`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateSolveOptions {
    /// Largest difference between normalized quad distances that still agrees
    pub tolerance: f64,
    /// Quad distances that must agree for a match
    pub min_matches: usize,
    /// Nearest neighbors in each quad
    pub neighbors: usize,
    /// Faintest catalog magnitude considered
    pub max_magnitude: f64,
}

impl Default for PlateSolveOptions {
    fn default() -> Self {
        Self {
            tolerance: 0.04,
            min_matches: 5,
            neighbors: 3,
            max_magnitude: 4.0,
        }
    }
}

/// A reading identified as a catalog star
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedStar {
    pub reading: HorizonCoordinate,
    pub star: Star,
}

/// Pairwise separations within the quad of each point and its nearest
/// neighbors, scaled so the widest pair is 1
///
/// Only neighbors separated by `min_separation..=max_separation` degrees are
/// used. The shapes do not change when the whole sky is rotated.
fn quad_shapes(
    points: &[HorizonCoordinate],
    neighbors: usize,
    min_separation: f64,
    max_separation: f64,
) -> Vec<Vec<f64>> {
    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let mut nearby: Vec<(f64, &HorizonCoordinate)> = points
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, other)| (point.angular_distance_to(other), other))
                .filter(|(distance, _)| (min_separation..=max_separation).contains(distance))
                .collect();
            nearby.sort_by(|a, b| a.0.total_cmp(&b.0));

            let quad: Vec<&HorizonCoordinate> = std::iter::once(point)
                .chain(nearby.into_iter().take(neighbors).map(|(_, other)| other))
                .collect();
            let mut distances = Vec::new();
            for (j, a) in quad.iter().enumerate() {
                for b in &quad[j + 1..] {
                    distances.push(a.angular_distance_to(b));
                }
            }
            let widest = distances.iter().copied().fold(0.0, f64::max);
            if widest > 0.0 {
                distances.iter_mut().for_each(|d| *d /= widest);
            }
            distances
        })
        .collect()
}

fn shape_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

/// Identify catalog stars among azimuth/altitude readings
///
/// Readings and the predicted sky are both reduced to quads, a point and
/// its nearest neighbors described by their scaled separations, so a
/// constant azimuth error in the readings does not matter. Each reading
/// takes the closest catalog quad and counts as detected when at least
/// `min_matches` separations agree within `tolerance`. Without an
/// approximate location the sky is predicted on the equator at the
/// longitude of the time's UTC offset.
pub fn plate_solve(
    readings: &[HorizonCoordinate],
    time: &DateTime<FixedOffset>,
    approximate: Option<&Location>,
    options: PlateSolveOptions,
) -> Vec<DetectedStar> {
    if readings.len() < options.neighbors + 1 {
        return Vec::new();
    }
    let location = approximate.copied().unwrap_or_else(|| {
        Location::constrained(0.0, time.offset().local_minus_utc() as f64 / 240.0)
    });

    let visible: Vec<(&Star, HorizonCoordinate)> = Star::catalog()
        .iter()
        .filter(|star| star.magnitude <= options.max_magnitude)
        .map(|star| (star, star_position(star, time, &location, true)))
        .filter(|(_, horizon)| horizon.altitude > PLATE_MIN_ALTITUDE)
        .collect();
    let sky: Vec<HorizonCoordinate> = visible.iter().map(|(_, horizon)| *horizon).collect();

    let windows = (0..=10)
        .map(|step| (step as f64 * 0.1, step as f64 * 0.1 + PLATE_WINDOW))
        .chain(std::iter::once((0.0, 180.0)));
    let mut catalog: Vec<(usize, Vec<f64>)> = Vec::new();
    for (min_separation, max_separation) in windows {
        for entry in quad_shapes(&sky, options.neighbors, min_separation, max_separation)
            .into_iter()
            .enumerate()
        {
            if !catalog.contains(&entry) {
                catalog.push(entry);
            }
        }
    }

    let detected: Vec<DetectedStar> = quad_shapes(readings, options.neighbors, 0.0, 180.0)
        .iter()
        .zip(readings)
        .filter_map(|(shape, reading)| {
            let (index, best) = catalog
                .iter()
                .filter(|(_, candidate)| candidate.len() == shape.len())
                .min_by(|a, b| shape_distance(shape, &a.1).total_cmp(&shape_distance(shape, &b.1)))?;
            let agreeing = shape
                .iter()
                .zip(best)
                .filter(|(a, b)| (*a - *b).abs() < options.tolerance)
                .count();
            (agreeing >= options.min_matches).then(|| DetectedStar {
                reading: *reading,
                star: visible[*index].0.clone(),
            })
        })
        .collect();
    debug!(
        "Plate solve identified {} of {} readings against {} catalog stars",
        detected.len(),
        readings.len(),
        visible.len()
    );
    detected
}
