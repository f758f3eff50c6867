//! Lunar eclipses (Meeus ch. 54)
//!
//! Distances are in equatorial Earth radii, measured in the plane through
//! the Moon perpendicular to the shadow axis.

use super::{overlap, Eclipse};
use crate::astronomy::is_moon_up;
use crate::celestial::lunation::mean_phase;
use crate::celestial::{LunationArguments, Moon, MoonTruePhase};
use crate::constants::DAY_S;
use crate::coordinates::angle::{cos_deg, sin_deg};
use crate::coordinates::Location;
use crate::time::UniversalTime;
use chrono::{DateTime, Duration, FixedOffset};
use log::debug;

/// Lunations examined before giving up
const MAX_LUNATIONS: usize = 100;

/// Eclipses are only possible when |sin F| is below this
const NODE_LIMIT: f64 = 0.36;

const MOON_DIAMETER: f64 = 0.545;
const MOON_RADIUS: f64 = MOON_DIAMETER / 2.0;

/// Periodic terms of the time of maximum eclipse: coefficient in units of
/// 1e-4 days, power of E, then multiples of M, M', F1, A1 and Ω
const MAXIMUM_TERMS: [(f64, i32, f64, f64, f64, f64, f64); 16] = [
    (-4065.0, 0, 0.0, 1.0, 0.0, 0.0, 0.0),
    (1727.0, 1, 1.0, 0.0, 0.0, 0.0, 0.0),
    (161.0, 0, 0.0, 2.0, 0.0, 0.0, 0.0),
    (-97.0, 0, 0.0, 0.0, 2.0, 0.0, 0.0),
    (73.0, 1, -1.0, 1.0, 0.0, 0.0, 0.0),
    (-50.0, 1, 1.0, 1.0, 0.0, 0.0, 0.0),
    (-23.0, 0, 0.0, 1.0, -2.0, 0.0, 0.0),
    (21.0, 1, 2.0, 0.0, 0.0, 0.0, 0.0),
    (12.0, 0, 0.0, 1.0, 2.0, 0.0, 0.0),
    (6.0, 1, 1.0, 2.0, 0.0, 0.0, 0.0),
    (-4.0, 0, 0.0, 3.0, 0.0, 0.0, 0.0),
    (-3.0, 1, 1.0, 0.0, 2.0, 0.0, 0.0),
    (3.0, 0, 0.0, 0.0, 0.0, 1.0, 0.0),
    (-2.0, 1, 1.0, 0.0, -2.0, 0.0, 0.0),
    (-2.0, 1, -1.0, 2.0, 0.0, 0.0, 0.0),
    (-2.0, 0, 0.0, 0.0, 0.0, 0.0, 1.0),
];

/// Terms of P: coefficient in 1e-4, power of E, multiples of M, M', F1
const P_TERMS: [(f64, i32, f64, f64, f64); 7] = [
    (2070.0, 1, 1.0, 0.0, 0.0),
    (24.0, 1, 2.0, 0.0, 0.0),
    (-392.0, 0, 0.0, 1.0, 0.0),
    (116.0, 0, 0.0, 2.0, 0.0),
    (-73.0, 1, 1.0, 1.0, 0.0),
    (67.0, 1, -1.0, 1.0, 0.0),
    (118.0, 0, 0.0, 0.0, 2.0),
];

/// Terms of Q, cosines: coefficient in 1e-4, power of E, multiples of M, M'
const Q_TERMS: [(f64, i32, f64, f64); 6] = [
    (52207.0, 0, 0.0, 0.0),
    (-48.0, 1, 1.0, 0.0),
    (20.0, 1, 2.0, 0.0),
    (-3299.0, 0, 0.0, 1.0),
    (-60.0, 1, 1.0, 1.0),
    (41.0, 1, -1.0, 1.0),
];

/// Shadow geometry of one full moon near a node
#[derive(Debug, Clone, Copy)]
struct LunarEclipseParameters {
    maximum: UniversalTime,
    /// Least distance of the Moon's center from the shadow axis
    gamma: f64,
    /// Radius of the umbral cone at the Moon
    u: f64,
    /// Hourly motion of the Moon relative to the shadow
    n: f64,
}

impl LunarEclipseParameters {
    /// The first full moon near a node on or after the one following `ut`
    fn next(ut: &UniversalTime) -> crate::Result<Self> {
        let mut k = Moon::next_phase_k(ut, MoonTruePhase::Full);
        while sin_deg(LunationArguments::new(k).f).abs() > NODE_LIMIT {
            k += 1.0;
        }
        Self::at_lunation(k)
    }

    fn at_lunation(k: f64) -> crate::Result<Self> {
        let a = LunationArguments::new(k);
        let (e, m, mp) = (a.e, a.m, a.m_prime);
        let f1 = a.f - 0.02665 * sin_deg(a.omega);
        let a1 = 299.77 + 0.107408 * k - 0.009173 * a.t * a.t;

        let correction: f64 = MAXIMUM_TERMS
            .iter()
            .map(|&(c, ep, cm, cmp, cf, ca, co)| {
                c / 1e4 * e.powi(ep) * sin_deg(cm * m + cmp * mp + cf * f1 + ca * a1 + co * a.omega)
            })
            .sum();

        let p: f64 = P_TERMS
            .iter()
            .map(|&(c, ep, cm, cmp, cf)| c / 1e4 * e.powi(ep) * sin_deg(cm * m + cmp * mp + cf * f1))
            .sum();
        let q: f64 = Q_TERMS
            .iter()
            .map(|&(c, ep, cm, cmp)| c / 1e4 * e.powi(ep) * cos_deg(cm * m + cmp * mp))
            .sum();

        let w = cos_deg(f1).abs();
        let gamma = (p * cos_deg(f1) + q * sin_deg(f1)) * (1.0 - 0.0048 * w);
        let u = 0.0059 + 0.0046 * e * cos_deg(m) - 0.0182 * cos_deg(mp) + 0.0004 * cos_deg(2.0 * mp)
            - 0.0005 * cos_deg(m + mp);
        let n = 0.5458 + 0.04 * cos_deg(mp);

        let dynamical = UniversalTime::from_julian_day(mean_phase(k) + correction)?;
        Ok(Self {
            maximum: dynamical.plus_days(-dynamical.delta_t() / DAY_S),
            gamma,
            u,
            n,
        })
    }

    /// Umbral magnitude, above zero for any umbral eclipse and above one
    /// for a total one
    fn magnitude(&self) -> f64 {
        (1.0128 - self.u - self.gamma.abs()) / MOON_DIAMETER
    }

    /// Half the duration of the partial or the total phase
    fn semi_duration(&self, total: bool) -> Duration {
        let radius = if total { 0.4678 } else { 1.0128 };
        let minutes = 60.0 / self.n * ((radius - self.u).powi(2) - self.gamma.powi(2)).sqrt();
        Duration::milliseconds((minutes * 60_000.0).round() as i64)
    }

    /// Share of the Moon's disc inside the umbra at maximum
    fn obscuration(&self) -> f64 {
        overlap(0.7403 - self.u, MOON_RADIUS, self.gamma.abs())
    }
}

pub(super) fn next_lunar_eclipse(
    after: &DateTime<FixedOffset>,
    location: &Location,
    total: bool,
) -> Option<Eclipse> {
    let threshold = if total { 1.0 } else { 0.0 };
    let earliest_end = UniversalTime::from(after);
    let mut search_from = earliest_end - Duration::days(20);

    for lunation in 0..MAX_LUNATIONS {
        let parameters = LunarEclipseParameters::next(&search_from).ok()?;
        search_from = parameters.maximum + Duration::days(10);

        let magnitude = parameters.magnitude();
        if magnitude < threshold || magnitude <= 0.0 {
            continue;
        }

        let semi_duration = parameters.semi_duration(total);
        let start = (parameters.maximum - semi_duration).to_local(after.offset());
        let end = (parameters.maximum + semi_duration).to_local(after.offset());
        if end <= *after {
            continue;
        }
        if !is_moon_up(&start, location, false) && !is_moon_up(&end, location, false) {
            continue;
        }

        debug!("Lunar eclipse of magnitude {magnitude:.3} found after {} lunations", lunation + 1);
        return Some(Eclipse {
            start,
            peak: parameters.maximum.to_local(after.offset()),
            end,
            magnitude,
            obscuration: parameters.obscuration(),
        });
    }

    debug!("No lunar eclipse visible within {MAX_LUNATIONS} lunations");
    None
}
