//! Where a body appears in an observer's sky
//!
//! Combines a locator's equatorial position with the observer's local
//! sidereal time to produce azimuth and altitude, optionally corrected for
//! atmospheric refraction and for the observer's offset from Earth's center.

use crate::celestial::CelestialObject;
use crate::coordinates::angle::{atan2_deg, cos_deg, sin_deg, tan_deg};
use crate::coordinates::{EquatorialCoordinate, HorizonCoordinate, Location};
use crate::time::{SiderealTime, UniversalTime};
use crate::units::Distance;
use serde::{Deserialize, Serialize};

/// Corrections applied when observing a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObservationOptions {
    /// Raise the altitude by atmospheric refraction
    pub with_refraction: bool,
    /// Shift the body for the observer's position on Earth's surface
    pub with_parallax: bool,
}

impl ObservationOptions {
    pub fn new(with_refraction: bool, with_parallax: bool) -> Self {
        Self {
            with_refraction,
            with_parallax,
        }
    }
}

/// Local sidereal time for an observer
pub fn local_sidereal_time(ut: &UniversalTime, location: &Location) -> SiderealTime {
    ut.to_sidereal_time().at_longitude(location.longitude())
}

/// Horizon coordinate of an equatorial position at a local sidereal time
///
/// Parallax is applied when `distance` is given.
pub fn horizon_at_sidereal(
    equatorial: &EquatorialCoordinate,
    sidereal: &SiderealTime,
    latitude: f64,
    with_refraction: bool,
    distance: Option<Distance>,
) -> HorizonCoordinate {
    let horizon = match distance {
        Some(distance) => {
            HorizonCoordinate::from_equatorial_with_parallax(equatorial, sidereal, latitude, distance)
        }
        None => HorizonCoordinate::from_equatorial(equatorial, sidereal, latitude),
    };

    if with_refraction {
        horizon.with_refraction()
    } else {
        horizon
    }
}

/// Horizon coordinate of an equatorial position seen from `location` at `ut`
pub fn horizon_coordinate(
    equatorial: &EquatorialCoordinate,
    ut: &UniversalTime,
    location: &Location,
    with_refraction: bool,
    distance: Option<Distance>,
) -> HorizonCoordinate {
    horizon_at_sidereal(
        equatorial,
        &local_sidereal_time(ut, location),
        location.latitude(),
        with_refraction,
        distance,
    )
}

/// Observe a body from `location` at `ut`
pub fn observe<B: CelestialObject + ?Sized>(
    body: &B,
    ut: &UniversalTime,
    location: &Location,
    options: ObservationOptions,
) -> HorizonCoordinate {
    let distance = if options.with_parallax {
        body.distance_at(ut)
    } else {
        None
    };
    horizon_coordinate(
        &body.position_at(ut),
        ut,
        location,
        options.with_refraction,
        distance,
    )
}

/// Altitude of a body in degrees
pub fn altitude<B: CelestialObject + ?Sized>(
    body: &B,
    ut: &UniversalTime,
    location: &Location,
    options: ObservationOptions,
) -> f64 {
    observe(body, ut, location, options).altitude
}

/// Azimuth of a body in degrees east of north
///
/// Refraction only changes altitude, so it is never applied here.
pub fn azimuth<B: CelestialObject + ?Sized>(
    body: &B,
    ut: &UniversalTime,
    location: &Location,
    options: ObservationOptions,
) -> f64 {
    let options = ObservationOptions {
        with_refraction: false,
        ..options
    };
    observe(body, ut, location, options).azimuth
}

/// Parallactic angle in degrees (Meeus 14.1)
///
/// The angle at the body between the directions to the zenith and to the
/// north celestial pole, positive west of the meridian.
pub fn parallactic_angle<B: CelestialObject + ?Sized>(
    body: &B,
    ut: &UniversalTime,
    location: &Location,
) -> f64 {
    let equatorial = body.position_at(ut);
    let hour_angle = equatorial.hour_angle(&local_sidereal_time(ut, location)) * 15.0;
    let declination = equatorial.declination;
    atan2_deg(
        sin_deg(hour_angle),
        tan_deg(location.latitude()) * cos_deg(declination)
            - sin_deg(declination) * cos_deg(hour_angle),
    )
}
