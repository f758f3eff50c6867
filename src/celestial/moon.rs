//! Lunar position, distance and phase (Meeus ch. 47-49)

use super::sun::Sun;
use super::CelestialObject;
use crate::constants::{
    EARTH_RADIUS_KM, MOON_MEAN_DISTANCE_KM, MOON_SEMI_DIAMETER_KM_ASEC, SUPERMOON_DISTANCE_KM,
};
use crate::coordinates::angle::{
    atan2_deg, cos_deg, normalize_degrees, polynomial, sin_deg,
};
use crate::coordinates::{EclipticCoordinate, EquatorialCoordinate};
use crate::nutationlib::{nutation_in_longitude, true_obliquity};
use crate::time::UniversalTime;
use crate::units::Distance;
use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

/// The Moon as seen from Earth's center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Moon;

/// The eight named phases, each spanning 45 degrees of phase angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoonTruePhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    ThirdQuarter,
    WaningCrescent,
}

impl MoonTruePhase {
    /// Phases in order of increasing phase angle, starting at New
    pub const ALL: [MoonTruePhase; 8] = [
        MoonTruePhase::New,
        MoonTruePhase::WaxingCrescent,
        MoonTruePhase::FirstQuarter,
        MoonTruePhase::WaxingGibbous,
        MoonTruePhase::Full,
        MoonTruePhase::WaningGibbous,
        MoonTruePhase::ThirdQuarter,
        MoonTruePhase::WaningCrescent,
    ];

    /// Phase angle at the center of this phase
    pub fn center_angle(&self) -> f64 {
        self.index() as f64 * 45.0
    }

    /// Inclusive start of the phase angle range
    pub fn start_angle(&self) -> f64 {
        normalize_degrees(self.center_angle() - 22.5)
    }

    /// Exclusive end of the phase angle range
    pub fn end_angle(&self) -> f64 {
        normalize_degrees(self.center_angle() + 22.5)
    }

    /// Classify a phase angle in degrees
    pub fn from_phase_angle(phase_angle: f64) -> Self {
        let index = (normalize_degrees(phase_angle + 22.5) / 45.0).floor() as usize;
        Self::ALL[index.min(7)]
    }

    /// Fraction of a lunation from new moon at which this phase is centered
    pub fn lunation_fraction(&self) -> f64 {
        self.index() as f64 * 0.125
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoonTruePhase::New => "New Moon",
            MoonTruePhase::WaxingCrescent => "Waxing Crescent",
            MoonTruePhase::FirstQuarter => "First Quarter",
            MoonTruePhase::WaxingGibbous => "Waxing Gibbous",
            MoonTruePhase::Full => "Full Moon",
            MoonTruePhase::WaningGibbous => "Waning Gibbous",
            MoonTruePhase::ThirdQuarter => "Third Quarter",
            MoonTruePhase::WaningCrescent => "Waning Crescent",
        }
    }

    fn index(&self) -> usize {
        match self {
            MoonTruePhase::New => 0,
            MoonTruePhase::WaxingCrescent => 1,
            MoonTruePhase::FirstQuarter => 2,
            MoonTruePhase::WaxingGibbous => 3,
            MoonTruePhase::Full => 4,
            MoonTruePhase::WaningGibbous => 5,
            MoonTruePhase::ThirdQuarter => 6,
            MoonTruePhase::WaningCrescent => 7,
        }
    }
}

/// The Moon's phase and the illuminated percentage of its disc
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoonPhase {
    pub phase: MoonTruePhase,
    /// Illuminated fraction of the disc, 0 to 100
    pub illumination: f64,
}

impl Moon {
    /// Apparent equatorial coordinate for `t` Julian centuries (TT) since J2000.0
    pub fn coordinates_at(&self, t: f64) -> EquatorialCoordinate {
        let ecliptic = self.ecliptic_at(t);
        let eq = ecliptic.to_equatorial(true_obliquity(t));
        EquatorialCoordinate::apparent(eq.declination, eq.right_ascension)
    }

    /// Apparent geocentric ecliptic coordinate, nutation included
    pub fn ecliptic_at(&self, t: f64) -> EclipticCoordinate {
        let args = Arguments::new(t);
        let l_prime = args.mean_longitude;

        let mut sum_l: f64 = LONGITUDE_DISTANCE_TERMS
            .iter()
            .map(|row| {
                row[4] as f64 * args.eccentricity_factor(row[1]) * sin_deg(args.combine(row))
            })
            .sum();
        let mut sum_b: f64 = LATITUDE_TERMS
            .iter()
            .map(|row| {
                row[4] as f64 * args.eccentricity_factor(row[1]) * sin_deg(args.combine(row))
            })
            .sum();

        let a1 = normalize_degrees(119.75 + 131.849 * t);
        let a2 = normalize_degrees(53.09 + 479_264.290 * t);
        let a3 = normalize_degrees(313.45 + 481_266.484 * t);

        sum_l += 3958.0 * sin_deg(a1) + 1962.0 * sin_deg(l_prime - args.f) + 318.0 * sin_deg(a2);
        sum_b += -2235.0 * sin_deg(l_prime)
            + 382.0 * sin_deg(a3)
            + 175.0 * sin_deg(a1 - args.f)
            + 175.0 * sin_deg(a1 + args.f)
            + 127.0 * sin_deg(l_prime - args.m_prime)
            - 115.0 * sin_deg(l_prime + args.m_prime);

        EclipticCoordinate::new(
            sum_b / 1_000_000.0,
            l_prime + sum_l / 1_000_000.0 + nutation_in_longitude(t),
        )
    }

    /// Earth-Moon center distance for `t` Julian centuries (TT) since J2000.0
    pub fn distance_at(&self, t: f64) -> Distance {
        let args = Arguments::new(t);
        let sum_r: f64 = LONGITUDE_DISTANCE_TERMS
            .iter()
            .map(|row| {
                row[5] as f64 * args.eccentricity_factor(row[1]) * cos_deg(args.combine(row))
            })
            .sum();
        Distance::from_kilometers(MOON_MEAN_DISTANCE_KM + sum_r / 1000.0)
    }

    /// Phase angle in degrees: 0 at new moon, 180 at full moon, increasing
    /// with the Moon's age
    pub fn phase_angle(&self, ut: &UniversalTime) -> f64 {
        let args = Arguments::new(ut.terrestrial_centuries());
        let d = args.d;
        let m = args.m;
        let mp = args.m_prime;

        // Geocentric elongation corrected for the main lunar and solar inequalities
        let elongation = d + 6.289 * sin_deg(mp) - 2.100 * sin_deg(m)
            + 1.274 * sin_deg(2.0 * d - mp)
            + 0.658 * sin_deg(2.0 * d)
            + 0.214 * sin_deg(2.0 * mp)
            + 0.110 * sin_deg(d);
        normalize_degrees(elongation)
    }

    /// Illuminated percentage of the disc for a phase angle
    pub fn illumination(phase_angle: f64) -> f64 {
        (1.0 - cos_deg(phase_angle)) / 2.0 * 100.0
    }

    pub fn phase(&self, ut: &UniversalTime) -> MoonPhase {
        let phase_angle = self.phase_angle(ut);
        MoonPhase {
            phase: MoonTruePhase::from_phase_angle(phase_angle),
            illumination: Moon::illumination(phase_angle),
        }
    }

    /// True when the Moon is full and closer than the supermoon threshold
    pub fn is_super_moon(&self, ut: &UniversalTime) -> bool {
        self.phase(ut).phase == MoonTruePhase::Full
            && Moon::distance_at(self, ut.terrestrial_centuries()).kilometers()
                <= SUPERMOON_DISTANCE_KM
    }

    /// Lunation number `k` of the next occurrence of `phase` (Meeus 49.2)
    ///
    /// Integer values are new moons counted from 2000 January 6; the
    /// fractional part is the phase's lunation fraction.
    pub fn next_phase_k(ut: &UniversalTime, phase: MoonTruePhase) -> f64 {
        let naive = ut.naive();
        let year = naive.year() as f64
            + naive.ordinal() as f64 / 365.25
            + (naive.hour() as f64 / 24.0) / 365.25
            + (naive.minute() as f64 / 1440.0) / 365.25;
        let k = (year - 2000.0) * 12.3685;

        let target = phase.lunation_fraction();
        let whole = k.floor();
        if k - whole > target {
            whole + 1.0 + target
        } else {
            whole + target
        }
    }

    /// Topocentric angular diameter in degrees for a Moon at `altitude`
    ///
    /// The disc grows as the Moon climbs because the observer gets closer
    /// to it (Meeus 55.2 with the augmentation term).
    pub fn angular_diameter(&self, ut: &UniversalTime, altitude: f64) -> f64 {
        let distance = Moon::distance_at(self, ut.terrestrial_centuries()).kilometers();
        let semi_diameter = MOON_SEMI_DIAMETER_KM_ASEC / distance;
        let sin_parallax = EARTH_RADIUS_KM / distance;
        2.0 * semi_diameter * (1.0 + sin_deg(altitude) * sin_parallax) / 3600.0
    }

    /// Position angle of the bright limb in degrees, measured eastward from
    /// celestial north (Meeus 48.5)
    pub fn bright_limb_position_angle(&self, ut: &UniversalTime) -> f64 {
        let t = ut.terrestrial_centuries();
        let sun = Sun.coordinates_at(t);
        let moon = self.coordinates_at(t);
        let delta_ra = sun.right_ascension - moon.right_ascension;
        normalize_degrees(atan2_deg(
            cos_deg(sun.declination) * sin_deg(delta_ra),
            sin_deg(sun.declination) * cos_deg(moon.declination)
                - cos_deg(sun.declination) * sin_deg(moon.declination) * cos_deg(delta_ra),
        ))
    }
}

impl CelestialObject for Moon {
    fn position_at(&self, ut: &UniversalTime) -> EquatorialCoordinate {
        self.coordinates_at(ut.terrestrial_centuries())
    }

    fn distance_at(&self, ut: &UniversalTime) -> Option<Distance> {
        Some(Moon::distance_at(self, ut.terrestrial_centuries()))
    }
}

/// Fundamental arguments of the lunar theory in degrees
struct Arguments {
    mean_longitude: f64,
    d: f64,
    m: f64,
    m_prime: f64,
    f: f64,
    e: f64,
}

impl Arguments {
    fn new(t: f64) -> Self {
        Self {
            mean_longitude: normalize_degrees(polynomial(
                t,
                &[218.3164477, 481_267.88123421, -0.0015786, 1.0 / 538_841.0, -1.0 / 65_194_000.0],
            )),
            d: normalize_degrees(polynomial(
                t,
                &[297.8501921, 445_267.1114034, -0.0018819, 1.0 / 545_868.0, -1.0 / 113_065_000.0],
            )),
            m: Sun.mean_anomaly(t),
            m_prime: normalize_degrees(polynomial(
                t,
                &[134.9633964, 477_198.8675055, 0.0087414, 1.0 / 69_699.0, -1.0 / 14_712_000.0],
            )),
            f: normalize_degrees(polynomial(
                t,
                &[93.2720950, 483_202.0175233, -0.0036539, -1.0 / 3_526_000.0, 1.0 / 863_310_000.0],
            )),
            e: polynomial(t, &[1.0, -0.002516, -0.0000075]),
        }
    }

    /// Correction for the decreasing eccentricity of Earth's orbit
    fn eccentricity_factor(&self, m_multiple: i32) -> f64 {
        match m_multiple.abs() {
            1 => self.e,
            2 => self.e * self.e,
            _ => 1.0,
        }
    }

    fn combine(&self, row: &[i32]) -> f64 {
        row[0] as f64 * self.d
            + row[1] as f64 * self.m
            + row[2] as f64 * self.m_prime
            + row[3] as f64 * self.f
    }
}

/// Periodic terms for longitude (sine, 1e-6 degree) and distance (cosine,
/// 1e-3 km). Columns: D, M, M', F, longitude, distance.
#[rustfmt::skip]
const LONGITUDE_DISTANCE_TERMS: [[i32; 6]; 60] = [
    [0, 0, 1, 0, 6288774, -20905355],
    [2, 0, -1, 0, 1274027, -3699111],
    [2, 0, 0, 0, 658314, -2955968],
    [0, 0, 2, 0, 213618, -569925],
    [0, 1, 0, 0, -185116, 48888],
    [0, 0, 0, 2, -114332, -3149],
    [2, 0, -2, 0, 58793, 246158],
    [2, -1, -1, 0, 57066, -152138],
    [2, 0, 1, 0, 53322, -170733],
    [2, -1, 0, 0, 45758, -204586],
    [0, 1, -1, 0, -40923, -129620],
    [1, 0, 0, 0, -34720, 108743],
    [0, 1, 1, 0, -30383, 104755],
    [2, 0, 0, -2, 15327, 10321],
    [0, 0, 1, 2, -12528, 0],
    [0, 0, 1, -2, 10980, 79661],
    [4, 0, -1, 0, 10675, -34782],
    [0, 0, 3, 0, 10034, -23210],
    [4, 0, -2, 0, 8548, -21636],
    [2, 1, -1, 0, -7888, 24208],
    [2, 1, 0, 0, -6766, 30824],
    [1, 0, -1, 0, -5163, -8379],
    [1, 1, 0, 0, 4987, -16675],
    [2, -1, 1, 0, 4036, -12831],
    [2, 0, 2, 0, 3994, -10445],
    [4, 0, 0, 0, 3861, -11650],
    [2, 0, -3, 0, 3665, 14403],
    [0, 1, -2, 0, -2689, -7003],
    [2, 0, -1, 2, -2602, 0],
    [2, -1, -2, 0, 2390, 10056],
    [1, 0, 1, 0, -2348, 6322],
    [2, -2, 0, 0, 2236, -9884],
    [0, 1, 2, 0, -2120, 5751],
    [0, 2, 0, 0, -2069, 0],
    [2, -2, -1, 0, 2048, -4950],
    [2, 0, 1, -2, -1773, 4130],
    [2, 0, 0, 2, -1595, 0],
    [4, -1, -1, 0, 1215, -3958],
    [0, 0, 2, 2, -1110, 0],
    [3, 0, -1, 0, -892, 3258],
    [2, 1, 1, 0, -810, 2616],
    [4, -1, -2, 0, 759, -1897],
    [0, 2, -1, 0, -713, -2117],
    [2, 2, -1, 0, -700, 2354],
    [2, 1, -2, 0, 691, 0],
    [2, -1, 0, -2, 596, 0],
    [4, 0, 1, 0, 549, -1423],
    [0, 0, 4, 0, 537, -1117],
    [4, -1, 0, 0, 520, -1571],
    [1, 0, -2, 0, -487, -1739],
    [2, 1, 0, -2, -399, 0],
    [0, 0, 2, -2, -381, -4421],
    [1, 1, 1, 0, 351, 0],
    [3, 0, -2, 0, -340, 0],
    [4, 0, -3, 0, 330, 0],
    [2, -1, 2, 0, 327, 0],
    [0, 2, 1, 0, -323, 1165],
    [1, 1, -1, 0, 299, 0],
    [2, 0, 3, 0, 294, 0],
    [2, 0, -1, -2, 0, 8752],
];

/// Periodic terms for latitude (sine, 1e-6 degree). Columns: D, M, M', F,
/// latitude.
#[rustfmt::skip]
const LATITUDE_TERMS: [[i32; 5]; 60] = [
    [0, 0, 0, 1, 5128122],
    [0, 0, 1, 1, 280602],
    [0, 0, 1, -1, 277693],
    [2, 0, 0, -1, 173237],
    [2, 0, -1, 1, 55413],
    [2, 0, -1, -1, 46271],
    [2, 0, 0, 1, 32573],
    [0, 0, 2, 1, 17198],
    [2, 0, 1, -1, 9266],
    [0, 0, 2, -1, 8822],
    [2, -1, 0, -1, 8216],
    [2, 0, -2, -1, 4324],
    [2, 0, 1, 1, 4200],
    [2, 1, 0, -1, -3359],
    [2, -1, -1, 1, 2463],
    [2, -1, 0, 1, 2211],
    [2, -1, -1, -1, 2065],
    [0, 1, -1, -1, -1870],
    [4, 0, -1, -1, 1828],
    [0, 1, 0, 1, -1794],
    [0, 0, 0, 3, -1749],
    [0, 1, -1, 1, -1565],
    [1, 0, 0, 1, -1491],
    [0, 1, 1, 1, -1475],
    [0, 1, 1, -1, -1410],
    [0, 1, 0, -1, -1344],
    [1, 0, 0, -1, -1335],
    [0, 0, 3, 1, 1107],
    [4, 0, 0, -1, 1021],
    [4, 0, -1, 1, 833],
    [0, 0, 1, -3, 777],
    [4, 0, -2, 1, 671],
    [2, 0, 0, -3, 607],
    [2, 0, 2, -1, 596],
    [2, -1, 1, -1, 491],
    [2, 0, -2, 1, -451],
    [0, 0, 3, -1, 439],
    [2, 0, 2, 1, 422],
    [2, 0, -3, -1, 421],
    [2, 1, -1, 1, -366],
    [2, 1, 0, 1, -351],
    [4, 0, 0, 1, 331],
    [2, -1, 1, 1, 315],
    [2, -2, 0, -1, 302],
    [0, 0, 1, 3, -283],
    [2, 1, 1, -1, -229],
    [1, 1, 0, -1, 223],
    [1, 1, 0, 1, 223],
    [0, 1, -2, -1, -220],
    [2, 1, -1, -1, -220],
    [1, 0, 1, 1, -185],
    [2, -1, -2, -1, 181],
    [0, 1, 2, 1, -177],
    [4, 0, -2, -1, 176],
    [4, -1, -1, -1, 166],
    [1, 0, 1, -1, -164],
    [4, 0, 1, -1, 132],
    [1, 0, -1, -1, -119],
    [4, -1, 0, -1, 115],
    [2, -2, 0, 1, 107],
];
