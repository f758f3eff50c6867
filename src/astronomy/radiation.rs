//! Clear-sky solar irradiance
//!
//! Irradiance is the extraterrestrial flux, corrected for Earth's orbital
//! eccentricity, attenuated through an air mass of `1 / sin(altitude)`.

use crate::celestial::Sun;
use crate::coordinates::angle::{cos_deg, sin_deg};
use crate::coordinates::Location;
use crate::positions::{self, ObservationOptions};
use crate::time::UniversalTime;
use chrono::{DateTime, Datelike, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

/// Extraterrestrial flux at 1 AU in kW/m²
const SOLAR_CONSTANT: f64 = 1.353;

/// Fraction of the flux that survives one air mass
const ATMOSPHERIC_TRANSMITTANCE: f64 = 0.7;

const PANEL_SAMPLE_MINUTES: i64 = 10;

/// Orientation of a flat solar panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarPanelPosition {
    /// Angle from horizontal in degrees
    pub tilt: f64,
    /// Direction the panel faces, degrees east of north
    pub bearing: f64,
}

impl SolarPanelPosition {
    pub fn new(tilt: f64, bearing: f64) -> Self {
        Self { tilt, bearing }
    }
}

/// Sun altitude and azimuth at one instant
#[derive(Debug, Clone, Copy)]
struct SunSample {
    day_of_year: u32,
    altitude: f64,
    azimuth: f64,
}

impl SunSample {
    fn at(ut: &UniversalTime, location: &Location, with_refraction: bool) -> Self {
        let horizon = positions::observe(
            &Sun,
            ut,
            location,
            ObservationOptions::new(with_refraction, false),
        );
        Self {
            day_of_year: ut.date().ordinal(),
            altitude: horizon.altitude,
            azimuth: horizon.azimuth,
        }
    }

    /// Irradiance on a surface facing the Sun, kW/m²
    fn direct(&self) -> f64 {
        if self.altitude < 0.0 {
            return 0.0;
        }
        let air_mass = 1.0 / cos_deg(90.0 - self.altitude);
        let eccentricity = 1.0 + 0.033 * cos_deg(360.0 * (self.day_of_year as f64 - 2.0) / 365.0);
        eccentricity * SOLAR_CONSTANT * ATMOSPHERIC_TRANSMITTANCE.powf(air_mass.powf(0.678))
    }

    /// Irradiance on a panel, negative when the Sun is behind it
    fn on_panel(&self, panel: &SolarPanelPosition) -> f64 {
        let incidence = cos_deg(self.altitude)
            * sin_deg(panel.tilt)
            * cos_deg(panel.bearing - self.azimuth)
            + sin_deg(self.altitude) * cos_deg(panel.tilt);
        self.direct() * incidence
    }
}

/// Clear-sky irradiance in kW/m² on a surface facing the Sun
///
/// Zero while the Sun is below the horizon.
pub fn solar_radiation(
    time: &DateTime<FixedOffset>,
    location: &Location,
    with_refraction: bool,
) -> f64 {
    SunSample::at(&UniversalTime::from(time), location, with_refraction).direct()
}

/// Clear-sky irradiance in kW/m² on a tilted panel
pub fn solar_radiation_on_panel(
    time: &DateTime<FixedOffset>,
    location: &Location,
    panel: &SolarPanelPosition,
    with_refraction: bool,
) -> f64 {
    SunSample::at(&UniversalTime::from(time), location, with_refraction).on_panel(panel)
}

/// The fixed tilt that collects the most energy between `start` and `end`
///
/// The panel faces the equator. Tilts are tried in whole degrees against
/// the Sun's path sampled every ten minutes.
pub fn optimal_solar_panel_position(
    start: &DateTime<FixedOffset>,
    end: &DateTime<FixedOffset>,
    location: &Location,
) -> SolarPanelPosition {
    let bearing = if location.is_northern_hemisphere() {
        180.0
    } else {
        0.0
    };

    let mut samples = Vec::new();
    let mut time = *start;
    while time <= *end {
        let sample = SunSample::at(&UniversalTime::from(&time), location, false);
        if sample.altitude >= 0.0 {
            samples.push(sample);
        }
        time += Duration::minutes(PANEL_SAMPLE_MINUTES);
    }

    let energy = |tilt: f64| -> f64 {
        let panel = SolarPanelPosition::new(tilt, bearing);
        samples.iter().map(|s| s.on_panel(&panel).max(0.0)).sum()
    };

    let mut best = SolarPanelPosition::new(0.0, bearing);
    let mut most = energy(0.0);
    for tilt in 1..=90 {
        let collected = energy(tilt as f64);
        if collected > most {
            most = collected;
            best.tilt = tilt as f64;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::super::test_support::local;
    use super::*;
    use approx::assert_abs_diff_eq;

    fn new_york() -> Location {
        Location::new(40.7128, -74.0060).unwrap()
    }

    #[test]
    fn test_solar_radiation() {
        let morning = local(0, (2020, 9, 13), (13, 8));
        assert_abs_diff_eq!(solar_radiation(&morning, &new_york(), false), 0.734, epsilon = 0.01);

        let night = local(0, (2020, 9, 14), (1, 58));
        assert_eq!(solar_radiation(&night, &new_york(), false), 0.0);

        let equinox_noon = local(0, (2021, 3, 20), (12, 0));
        let equator = Location::new(0.0, 0.0).unwrap();
        assert_abs_diff_eq!(solar_radiation(&equinox_noon, &equator, false), 0.955, epsilon = 0.01);
    }

    #[test]
    fn test_solar_radiation_on_panel() {
        let morning = local(0, (2020, 9, 13), (13, 8));
        let cases = [((30.0, 180.0), 0.412), ((30.0, 90.0), 0.598), ((0.0, 0.0), 0.340)];
        for ((tilt, bearing), expected) in cases {
            let panel = SolarPanelPosition::new(tilt, bearing);
            let actual = solar_radiation_on_panel(&morning, &new_york(), &panel, false);
            assert_abs_diff_eq!(actual, expected, epsilon = 0.01);
        }
    }

    #[test]
    fn test_flat_panel_gets_the_vertical_component() {
        let time = local(-4, (2020, 9, 13), (12, 0));
        let flat = solar_radiation_on_panel(&time, &new_york(), &SolarPanelPosition::new(0.0, 123.0), false);
        let direct = solar_radiation(&time, &new_york(), false);
        assert!(flat < direct);
        assert!(flat > 0.0);
    }

    #[test]
    fn test_optimal_panel_position() {
        let sydney = Location::new(-33.8688, 151.2093).unwrap();
        let cases = [
            (new_york(), local(0, (2021, 6, 21), (4, 0)), 180.0, 5.0),
            (new_york(), local(0, (2021, 12, 21), (5, 0)), 180.0, 68.0),
            (sydney, local(0, (2021, 12, 21), (0, 0)), 0.0, 0.0),
            (sydney, local(0, (2021, 6, 21), (0, 0)), 0.0, 62.0),
        ];
        for (location, start, bearing, tilt) in cases {
            let end = start + Duration::days(1);
            let position = optimal_solar_panel_position(&start, &end, &location);
            assert_eq!(position.bearing, bearing);
            assert_abs_diff_eq!(position.tilt, tilt, epsilon = 3.0);
        }
    }
}
