//! Constants module for astronomical calculations

use std::f64::consts::PI;

// Astronomical distances
/// Astronomical Unit in meters (per IAU 2012 Resolution B2)
pub const AU_M: f64 = 149_597_870_700.0;
/// Astronomical Unit in kilometers
pub const AU_KM: f64 = 149_597_870.700;
/// Rounded AU used by the planetary element model
pub const PLANET_AU_KM: f64 = 149_597_871.0;
/// Semi-major axis of the Sun's apparent orbit in kilometers
pub const SUN_SEMI_MAJOR_AXIS_KM: f64 = 1.495_985e8;
/// Mean Earth-Moon distance in kilometers
pub const MOON_MEAN_DISTANCE_KM: f64 = 385_000.56;
/// A full moon closer than this is a supermoon
pub const SUPERMOON_DISTANCE_KM: f64 = 360_000.0;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// Minutes in a day
pub const DAY_MIN: f64 = 1_440.0;
/// J2000.0 epoch as Julian date
pub const J2000: f64 = 2_451_545.0;
/// Days in a Julian century
pub const JULIAN_CENTURY: f64 = 36_525.0;
/// Julian date of 1900 January 0.5, the sidereal time reference epoch
pub const J1900: f64 = 2_415_020.0;
/// Ratio of sidereal to solar day rates
pub const SIDEREAL_RATE: f64 = 1.002_738;
/// Mean synodic month in days
pub const SYNODIC_MONTH: f64 = 29.530_588_861;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;

// Earth constants
/// Earth's equatorial radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6_378.14;
/// Ratio of Earth's polar to equatorial radius
pub const EARTH_AXIS_RATIO: f64 = 0.996_647_19;

// Sun and Moon
/// Solar semi-diameter at 1 AU in arcseconds
pub const SUN_SEMI_DIAMETER_ASEC: f64 = 959.63;
/// Lunar semi-diameter constant (km * arcseconds)
pub const MOON_SEMI_DIAMETER_KM_ASEC: f64 = 358_473_400.0;
/// One nautical mile, one arcminute of a great circle (km)
pub const NAUTICAL_MILE_KM: f64 = 1.852;
