//! Planetary positions from mean orbital elements
//!
//! Each planet moves on a fixed Keplerian ellipse defined by its J2000.0
//! elements (Lawrence, *Celestial Calculations*, ch. 8). Geocentric
//! positions are found by combining the planet's and Earth's heliocentric
//! positions, with separate geometry for planets inside and outside
//! Earth's orbit.

use crate::celestial::CelestialObject;
use crate::constants::{J2000, PLANET_AU_KM};
use crate::coordinates::angle::{
    asin_deg, atan2_deg, atan_deg, cos_deg, normalize_degrees, sin_deg, tan_deg,
};
use crate::coordinates::{EclipticCoordinate, EquatorialCoordinate};
use crate::nutationlib::simple_obliquity;
use crate::time::UniversalTime;
use crate::units::Distance;
use crate::SkycalcError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Days in a tropical year, the unit of the orbital periods
const TROPICAL_YEAR: f64 = 365.242191;

/// Enum representing the major planets, Earth included as the observer's platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

/// Mean orbital elements at J2000.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    /// Order from the Sun, Mercury = 1
    pub order: u8,
    /// Orbital period in tropical years
    pub period: f64,
    pub eccentricity: f64,
    /// Semi-major axis in AU
    pub semi_major_axis: f64,
    /// Angular diameter at 1 AU in arcseconds
    pub angular_diameter: f64,
    /// Visual magnitude at 1 AU
    pub visual_magnitude: f64,
    /// Inclination to the ecliptic in degrees
    pub inclination: f64,
    /// Mean longitude at the epoch in degrees
    pub longitude_at_epoch: f64,
    /// Longitude of perihelion in degrees
    pub longitude_of_perihelion: f64,
    /// Longitude of the ascending node in degrees
    pub longitude_of_ascending_node: f64,
}

/// A heliocentric ecliptic position with its radius vector in AU
#[derive(Debug, Clone, Copy, PartialEq)]
struct Heliocentric {
    latitude: f64,
    longitude: f64,
    radius: f64,
}

impl Planet {
    /// The seven planets visible from Earth, in order from the Sun
    pub const VISIBLE: [Planet; 7] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
    ];

    /// Get the planet's name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
        }
    }

    pub fn elements(&self) -> OrbitalElements {
        #[rustfmt::skip]
        let (order, period, eccentricity, semi_major_axis, angular_diameter, visual_magnitude,
             inclination, longitude_at_epoch, longitude_of_perihelion, longitude_of_ascending_node) =
            match self {
                Planet::Mercury => (1, 0.240847, 0.205636, 0.3870993, 6.74, -0.42, 7.004979, 252.250324, 77.457796, 48.330766),
                Planet::Venus => (2, 0.615197, 0.0067767, 0.723336, 16.92, -4.40, 3.394676, 181.979100, 131.602467, 76.679843),
                Planet::Earth => (3, 1.000017, 0.0167112, 1.000003, 0.0, 0.0, -0.000015, 100.464572, 102.937682, 0.0),
                Planet::Mars => (4, 1.880848, 0.093394, 1.523710, 9.36, -1.52, 1.849691, -4.553432, -23.943630, 49.559539),
                Planet::Jupiter => (5, 11.862615, 0.048393, 5.202887, 196.74, -9.40, 1.3043975, 34.396441, 14.728480, 100.473909),
                Planet::Saturn => (6, 29.447498, 0.053862, 9.536676, 165.60, -8.88, 2.485992, 49.954244, 92.598878, 113.662424),
                Planet::Uranus => (7, 84.016846, 0.0472574, 19.189165, 65.80, -7.19, 0.772638, 313.232810, 170.954276, 74.016925),
                Planet::Neptune => (8, 164.79132, 0.008590, 30.069923, 62.20, -6.87, 1.770043, -55.120030, 44.964762, 131.784226),
            };
        OrbitalElements {
            order,
            period,
            eccentricity,
            semi_major_axis,
            angular_diameter,
            visual_magnitude,
            inclination,
            longitude_at_epoch,
            longitude_of_perihelion,
            longitude_of_ascending_node,
        }
    }

    /// Geocentric ecliptic coordinate
    pub fn ecliptic_at(&self, ut: &UniversalTime) -> EclipticCoordinate {
        let planet = self.heliocentric(ut);
        let earth = Planet::Earth.heliocentric(ut);
        self.geocentric(&planet, &earth)
    }

    /// Distance from Earth in AU
    pub fn distance_au(&self, ut: &UniversalTime) -> f64 {
        let planet = self.heliocentric(ut);
        let earth = Planet::Earth.heliocentric(ut);
        distance_between(&planet, &earth)
    }

    /// False for Earth, which has no geocentric position
    pub fn is_observable(&self) -> bool {
        *self != Planet::Earth
    }

    /// Apparent angular diameter in degrees, `None` for Earth
    pub fn angular_diameter(&self, ut: &UniversalTime) -> Option<f64> {
        self.is_observable()
            .then(|| self.elements().angular_diameter / self.distance_au(ut) / 3600.0)
    }

    /// Apparent visual magnitude, including the phase of the disc
    ///
    /// `None` for Earth.
    pub fn magnitude(&self, ut: &UniversalTime) -> Option<f64> {
        if !self.is_observable() {
            return None;
        }
        let planet = self.heliocentric(ut);
        let earth = Planet::Earth.heliocentric(ut);
        let geocentric = self.geocentric(&planet, &earth);
        let distance = distance_between(&planet, &earth);
        let phase = (1.0 + cos_deg(geocentric.longitude - planet.longitude)) / 2.0;
        if phase <= 0.0 {
            return Some(f64::INFINITY);
        }
        Some(
            self.elements().visual_magnitude
                + 5.0 * (planet.radius * distance / phase.sqrt()).log10(),
        )
    }

    fn heliocentric(&self, ut: &UniversalTime) -> Heliocentric {
        let el = self.elements();
        let days = ut.julian_day() - J2000;
        let mean_anomaly = normalize_degrees(
            360.0 * days / (TROPICAL_YEAR * el.period) + el.longitude_at_epoch
                - el.longitude_of_perihelion,
        );
        let true_anomaly = true_anomaly(mean_anomaly, el.eccentricity);
        let longitude = normalize_degrees(true_anomaly + el.longitude_of_perihelion);
        let latitude = asin_deg(
            sin_deg(longitude - el.longitude_of_ascending_node) * sin_deg(el.inclination),
        );
        let radius = el.semi_major_axis * (1.0 - el.eccentricity * el.eccentricity)
            / (1.0 + el.eccentricity * cos_deg(true_anomaly));
        Heliocentric {
            latitude,
            longitude,
            radius,
        }
    }

    fn geocentric(&self, planet: &Heliocentric, earth: &Heliocentric) -> EclipticCoordinate {
        let el = self.elements();
        let node = el.longitude_of_ascending_node;

        // Heliocentric longitude projected onto the ecliptic
        let projected = normalize_degrees(
            node + atan2_deg(
                sin_deg(planet.longitude - node) * cos_deg(el.inclination),
                cos_deg(planet.longitude - node),
            ),
        );
        let projected_radius = planet.radius * cos_deg(planet.latitude);

        let longitude = if el.order <= Planet::Earth.elements().order {
            180.0
                + earth.longitude
                + atan2_deg(
                    projected_radius * sin_deg(earth.longitude - projected),
                    earth.radius - projected_radius * cos_deg(earth.longitude - projected),
                )
        } else {
            projected
                + atan2_deg(
                    earth.radius * sin_deg(projected - earth.longitude),
                    projected_radius - earth.radius * cos_deg(earth.longitude - projected),
                )
        };
        let longitude = normalize_degrees(longitude);

        let denominator = earth.radius * sin_deg(projected - earth.longitude);
        let latitude = if denominator.abs() < 1e-12 {
            // Exact conjunction or opposition; fall back to the radial geometry
            asin_deg(planet.radius * sin_deg(planet.latitude) / distance_between(planet, earth))
        } else {
            atan_deg(
                projected_radius * tan_deg(planet.latitude) * sin_deg(longitude - projected)
                    / denominator,
            )
        };

        EclipticCoordinate::new(latitude, longitude)
    }
}

/// Solve Kepler's equation by Newton's method and return the true anomaly
fn true_anomaly(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let m = mean_anomaly.to_radians();
    let mut e = m;
    for _ in 0..30 {
        let delta = (e - eccentricity * e.sin() - m) / (1.0 - eccentricity * e.cos());
        e -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    let v = 2.0 * (((1.0 + eccentricity) / (1.0 - eccentricity)).sqrt() * (e / 2.0).tan()).atan();
    v.to_degrees()
}

fn distance_between(planet: &Heliocentric, earth: &Heliocentric) -> f64 {
    (earth.radius * earth.radius + planet.radius * planet.radius
        - 2.0 * earth.radius * planet.radius * cos_deg(planet.longitude - earth.longitude))
    .sqrt()
}

impl CelestialObject for Planet {
    fn position_at(&self, ut: &UniversalTime) -> EquatorialCoordinate {
        let obliquity = simple_obliquity(ut.to_julian_centuries());
        self.ecliptic_at(ut).to_equatorial(obliquity)
    }

    fn distance_at(&self, ut: &UniversalTime) -> Option<Distance> {
        self.is_observable()
            .then(|| Distance::from_kilometers(self.distance_au(ut) * PLANET_AU_KM))
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Planet {
    type Err = SkycalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Planet::Mercury,
            Planet::Venus,
            Planet::Earth,
            Planet::Mars,
            Planet::Jupiter,
            Planet::Saturn,
            Planet::Uranus,
            Planet::Neptune,
        ]
        .into_iter()
        .find(|planet| planet.name().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| SkycalcError::UnknownBody(s.to_string()))
    }
}
