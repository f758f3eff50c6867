//! Locators for bodies in the sky
//!
//! Every locator answers the same two questions for an instant: where is
//! the body on the celestial sphere, and how far away is it. Fixed-direction
//! objects such as stars and meteor radiants have no meaningful distance.

use crate::coordinates::EquatorialCoordinate;
use crate::planetlib::Planet;
use crate::time::UniversalTime;
use crate::units::Distance;

pub mod lunation;
pub mod meteor;
pub mod moon;
pub mod star;
pub mod sun;

pub use lunation::LunationArguments;
pub use meteor::MeteorShower;
pub use moon::{Moon, MoonPhase, MoonTruePhase};
pub use star::Star;
pub use sun::Sun;

/// A trait for objects that have a position in the sky
pub trait CelestialObject {
    /// Equatorial coordinate of the object at a specific time
    fn position_at(&self, ut: &UniversalTime) -> EquatorialCoordinate;

    /// Distance from Earth's center, if the object has one
    fn distance_at(&self, ut: &UniversalTime) -> Option<Distance>;
}

/// Any body the crate can locate
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Sun,
    Moon,
    Planet(Planet),
    Star(Star),
    MeteorShower(MeteorShower),
}

impl Body {
    pub fn name(&self) -> &str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Planet(planet) => planet.name(),
            Body::Star(star) => &star.name,
            Body::MeteorShower(shower) => shower.name(),
        }
    }
}

impl CelestialObject for Body {
    fn position_at(&self, ut: &UniversalTime) -> EquatorialCoordinate {
        match self {
            Body::Sun => Sun.position_at(ut),
            Body::Moon => Moon.position_at(ut),
            Body::Planet(planet) => planet.position_at(ut),
            Body::Star(star) => star.position_at(ut),
            Body::MeteorShower(shower) => shower.position_at(ut),
        }
    }

    fn distance_at(&self, ut: &UniversalTime) -> Option<Distance> {
        match self {
            Body::Sun => CelestialObject::distance_at(&Sun, ut),
            Body::Moon => CelestialObject::distance_at(&Moon, ut),
            Body::Planet(planet) => planet.distance_at(ut),
            Body::Star(star) => star.distance_at(ut),
            Body::MeteorShower(shower) => shower.distance_at(ut),
        }
    }
}

impl From<Planet> for Body {
    fn from(planet: Planet) -> Self {
        Body::Planet(planet)
    }
}

impl From<Star> for Body {
    fn from(star: Star) -> Self {
        Body::Star(star)
    }
}

impl From<MeteorShower> for Body {
    fn from(shower: MeteorShower) -> Self {
        Body::MeteorShower(shower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_dispatch_matches_locators() {
        let ut = UniversalTime::from_ymd_hms(2021, 6, 1, 3, 0, 0).unwrap();
        assert_eq!(Body::Sun.position_at(&ut), Sun.position_at(&ut));
        assert_eq!(Body::Moon.position_at(&ut), Moon.position_at(&ut));
        assert_eq!(
            Body::from(Planet::Mars).position_at(&ut),
            Planet::Mars.position_at(&ut)
        );
        assert!(Body::from(MeteorShower::Leonids).distance_at(&ut).is_none());
        assert!(Body::Sun.distance_at(&ut).is_some());
    }

    #[test]
    fn test_names() {
        assert_eq!(Body::Moon.name(), "Moon");
        assert_eq!(Body::from(Planet::Jupiter).name(), "Jupiter");
        let vega = Star::named("Vega").unwrap();
        assert_eq!(Body::from(vega).name(), "Vega");
    }
}
