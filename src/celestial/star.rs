//! Fixed stars and a small bright-star catalog

use super::CelestialObject;
use crate::coordinates::EquatorialCoordinate;
use crate::precessionlib::{precess_from_j2000, ProperMotion};
use crate::time::UniversalTime;
use crate::units::Distance;
use crate::SkycalcError;
use lazy_static::lazy_static;

/// A star with a J2000.0 catalog position
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub name: String,
    /// Catalog position at epoch and equinox J2000.0
    pub coordinate: EquatorialCoordinate,
    pub proper_motion: ProperMotion,
    /// Apparent visual magnitude
    pub magnitude: f64,
    /// B-V color index
    pub color_index: f64,
}

impl Star {
    pub fn new(name: &str, coordinate: EquatorialCoordinate, magnitude: f64) -> Self {
        Self {
            name: name.to_string(),
            coordinate,
            proper_motion: ProperMotion::default(),
            magnitude,
            color_index: 0.0,
        }
    }

    pub fn with_proper_motion(mut self, proper_motion: ProperMotion) -> Self {
        self.proper_motion = proper_motion;
        self
    }

    pub fn with_color_index(mut self, color_index: f64) -> Self {
        self.color_index = color_index;
        self
    }

    /// Look up a catalog star by name, ignoring case
    pub fn named(name: &str) -> Result<Star, SkycalcError> {
        BRIGHT_STARS
            .iter()
            .find(|star| star.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| SkycalcError::UnknownBody(name.to_string()))
    }

    /// The built-in catalog, brightest first
    pub fn catalog() -> &'static [Star] {
        &BRIGHT_STARS
    }
}

impl CelestialObject for Star {
    fn position_at(&self, ut: &UniversalTime) -> EquatorialCoordinate {
        precess_from_j2000(&self.coordinate, &self.proper_motion, ut.to_julian_centuries())
    }

    fn distance_at(&self, _ut: &UniversalTime) -> Option<Distance> {
        None
    }
}

/// (name, RA degrees, Dec degrees, magnitude, B-V, pm RA*cos(Dec) mas/yr, pm Dec mas/yr)
#[rustfmt::skip]
const CATALOG_ROWS: [(&str, f64, f64, f64, f64, f64, f64); 18] = [
    ("Sirius",     101.287155, -16.716116, -1.46,  0.00,  -546.01, -1223.07),
    ("Canopus",     95.987958, -52.695661, -0.74,  0.15,     19.93,   23.24),
    ("Arcturus",   213.915300,  19.182409, -0.05,  1.23, -1093.39, -2000.06),
    ("Vega",       279.234735,  38.783689,  0.03,  0.00,    200.94,   286.23),
    ("Capella",     79.172328,  45.997991,  0.08,  0.80,     75.25,  -426.89),
    ("Rigel",       78.634467,  -8.201638,  0.13, -0.03,      1.31,     0.50),
    ("Procyon",    114.825498,   5.224988,  0.34,  0.42,   -714.59, -1036.80),
    ("Achernar",    24.428523, -57.236753,  0.46, -0.16,     88.02,   -40.08),
    ("Betelgeuse",  88.792939,   7.407064,  0.42,  1.85,     27.54,    11.30),
    ("Altair",     297.695827,   8.868321,  0.76,  0.22,    536.23,   385.29),
    ("Aldebaran",   68.980163,  16.509302,  0.86,  1.54,     63.45,  -188.94),
    ("Spica",      201.298247, -11.161319,  0.97, -0.23,    -42.35,   -30.67),
    ("Antares",    247.351915, -26.432003,  1.09,  1.83,    -12.11,   -23.30),
    ("Pollux",     116.328958,  28.026199,  1.14,  1.00,    -626.55,  -45.80),
    ("Fomalhaut",  344.412693, -29.622237,  1.16,  0.09,    328.95,  -164.67),
    ("Deneb",      310.357980,  45.280339,  1.25,  0.09,      2.01,     1.85),
    ("Regulus",    152.092962,  11.967209,  1.40, -0.11,   -248.73,     5.59),
    ("Polaris",     37.954561,  89.264109,  1.98,  0.60,     44.48,   -11.85),
];

lazy_static! {
    static ref BRIGHT_STARS: Vec<Star> = CATALOG_ROWS
        .iter()
        .map(|&(name, ra, dec, magnitude, color_index, pm_ra, pm_dec)| {
            Star::new(name, EquatorialCoordinate::new(dec, ra), magnitude)
                .with_color_index(color_index)
                .with_proper_motion(ProperMotion::from_milliarcseconds(pm_ra, pm_dec, dec))
        })
        .collect();
}
