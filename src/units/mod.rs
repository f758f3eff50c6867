//! Unit-tagged quantities

use crate::constants::{AU_KM, NAUTICAL_MILE_KM};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A distance, stored in kilometers
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Distance {
    kilometers: f64,
}

impl Distance {
    pub fn from_kilometers(kilometers: f64) -> Self {
        Self { kilometers }
    }

    pub fn from_astronomical_units(au: f64) -> Self {
        Self {
            kilometers: au * AU_KM,
        }
    }

    pub fn from_nautical_miles(nautical_miles: f64) -> Self {
        Self {
            kilometers: nautical_miles * NAUTICAL_MILE_KM,
        }
    }

    pub fn kilometers(&self) -> f64 {
        self.kilometers
    }

    pub fn meters(&self) -> f64 {
        self.kilometers * 1000.0
    }

    pub fn astronomical_units(&self) -> f64 {
        self.kilometers / AU_KM
    }

    pub fn nautical_miles(&self) -> f64 {
        self.kilometers / NAUTICAL_MILE_KM
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kilometers >= AU_KM / 10.0 {
            write!(f, "{:.4} AU", self.astronomical_units())
        } else {
            write!(f, "{:.0} km", self.kilometers)
        }
    }
}
