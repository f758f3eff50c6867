//! Annual meteor showers and their radiants

use super::CelestialObject;
use crate::coordinates::angle::hms_to_degrees;
use crate::coordinates::EquatorialCoordinate;
use crate::time::UniversalTime;
use crate::units::Distance;
use crate::SkycalcError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The major annual meteor showers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeteorShower {
    Quadrantids,
    Lyrids,
    EtaAquariids,
    DeltaAquariids,
    Perseids,
    Orionids,
    Leonids,
    Geminids,
    Ursids,
}

impl MeteorShower {
    /// Every shower, in calendar order of its peak
    pub const ALL: [MeteorShower; 9] = [
        MeteorShower::Quadrantids,
        MeteorShower::Lyrids,
        MeteorShower::EtaAquariids,
        MeteorShower::DeltaAquariids,
        MeteorShower::Perseids,
        MeteorShower::Orionids,
        MeteorShower::Leonids,
        MeteorShower::Geminids,
        MeteorShower::Ursids,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MeteorShower::Quadrantids => "Quadrantids",
            MeteorShower::Lyrids => "Lyrids",
            MeteorShower::EtaAquariids => "Eta Aquariids",
            MeteorShower::DeltaAquariids => "Delta Aquariids",
            MeteorShower::Perseids => "Perseids",
            MeteorShower::Orionids => "Orionids",
            MeteorShower::Leonids => "Leonids",
            MeteorShower::Geminids => "Geminids",
            MeteorShower::Ursids => "Ursids",
        }
    }

    /// Radiant position, fixed at the equinox of date
    pub fn radiant(&self) -> EquatorialCoordinate {
        let (declination, hours, minutes) = match self {
            MeteorShower::Quadrantids => (49.7, 15.0, 20.0),
            MeteorShower::Lyrids => (33.3, 18.0, 10.0),
            MeteorShower::EtaAquariids => (-1.0, 22.0, 30.0),
            MeteorShower::DeltaAquariids => (-16.3, 22.0, 42.0),
            MeteorShower::Perseids => (58.0, 3.0, 13.0),
            MeteorShower::Orionids => (15.6, 6.0, 21.0),
            MeteorShower::Leonids => (21.6, 10.0, 17.0),
            MeteorShower::Geminids => (32.3, 7.0, 24.0),
            MeteorShower::Ursids => (75.3, 14.0, 36.0),
        };
        EquatorialCoordinate::new(declination, hms_to_degrees(hours, minutes, 0.0))
    }

    /// Solar longitude at the peak, in degrees
    pub fn solar_longitude(&self) -> f64 {
        match self {
            MeteorShower::Quadrantids => 283.15,
            MeteorShower::Lyrids => 32.32,
            MeteorShower::EtaAquariids => 45.5,
            MeteorShower::DeltaAquariids => 127.0,
            MeteorShower::Perseids => 140.0,
            MeteorShower::Orionids => 208.0,
            MeteorShower::Leonids => 235.27,
            MeteorShower::Geminids => 262.2,
            MeteorShower::Ursids => 270.7,
        }
    }

    /// Length of the activity window in days, centered on the peak
    pub fn active_days(&self) -> u32 {
        match self {
            MeteorShower::Quadrantids => 20,
            MeteorShower::Lyrids => 10,
            MeteorShower::EtaAquariids => 40,
            MeteorShower::DeltaAquariids => 20,
            MeteorShower::Perseids => 40,
            MeteorShower::Orionids => 20,
            MeteorShower::Leonids => 20,
            MeteorShower::Geminids => 20,
            MeteorShower::Ursids => 10,
        }
    }

    /// Zenithal hourly rate at the peak
    pub fn rate(&self) -> u32 {
        match self {
            MeteorShower::Quadrantids => 120,
            MeteorShower::Lyrids => 18,
            MeteorShower::EtaAquariids => 50,
            MeteorShower::DeltaAquariids => 25,
            MeteorShower::Perseids => 100,
            MeteorShower::Orionids => 20,
            MeteorShower::Leonids => 15,
            MeteorShower::Geminids => 150,
            MeteorShower::Ursids => 10,
        }
    }
}

impl CelestialObject for MeteorShower {
    fn position_at(&self, _ut: &UniversalTime) -> EquatorialCoordinate {
        self.radiant()
    }

    fn distance_at(&self, _ut: &UniversalTime) -> Option<Distance> {
        None
    }
}

impl fmt::Display for MeteorShower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MeteorShower {
    type Err = SkycalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        MeteorShower::ALL
            .iter()
            .copied()
            .find(|shower| {
                shower
                    .name()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .map(|c| c.to_ascii_lowercase())
                    .eq(key.chars())
            })
            .ok_or_else(|| SkycalcError::UnknownBody(s.to_string()))
    }
}
