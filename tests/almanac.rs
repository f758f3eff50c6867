//! Known events through the public facade

use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use rstest::rstest;

use skycalc::almanac::SunTimesMode;
use skycalc::astronomy;
use skycalc::celestial::{MeteorShower, MoonTruePhase, Star};
use skycalc::eclipse::{next_eclipse, EclipseType};
use skycalc::planetlib::Planet;
use skycalc::{Location, SkycalcError};

fn local(offset: i32, (y, mo, d): (i32, u32, u32), (h, mi): (u32, u32)) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(offset * 3600)
        .unwrap()
        .with_ymd_and_hms(y, mo, d, h, mi, 0)
        .unwrap()
}

fn assert_near(expected: DateTime<FixedOffset>, actual: Option<DateTime<FixedOffset>>, minutes: i64) {
    let actual = actual.unwrap_or_else(|| panic!("expected {expected}, got None"));
    assert!(
        (expected - actual).num_seconds().abs() <= minutes * 60,
        "expected {expected}, got {actual}"
    );
}

#[rstest]
#[case(40.7128, -74.0060, -4, (2020, 6, 21), (5, 25), (20, 31))]
#[case(51.5074, -0.1278, 1, (2020, 10, 29), (7, 48), (17, 39))]
#[case(50.0755, 14.4378, 1, (2022, 12, 27), (8, 0), (16, 8))]
#[case(-33.8688, 151.2093, 11, (2021, 12, 21), (5, 41), (20, 5))]
fn sunrise_and_sunset(
    #[case] latitude: f64,
    #[case] longitude: f64,
    #[case] offset: i32,
    #[case] date: (i32, u32, u32),
    #[case] rise: (u32, u32),
    #[case] set: (u32, u32),
) {
    let location = Location::new(latitude, longitude).unwrap();
    let events = astronomy::sun_events(&local(offset, date, (12, 0)), &location, SunTimesMode::Actual, true);
    assert_near(local(offset, date, rise), events.rise, 3);
    assert_near(local(offset, date, set), events.set, 3);
}

#[rstest]
#[case((2020, 3, 1), MoonTruePhase::Full, (2020, 3, 9), (17, 48))]
#[case((2020, 3, 10), MoonTruePhase::New, (2020, 3, 24), (9, 28))]
#[case((2020, 3, 1), MoonTruePhase::FirstQuarter, (2020, 3, 2), (19, 57))]
fn next_principal_moon_phase(
    #[case] from: (i32, u32, u32),
    #[case] phase: MoonTruePhase,
    #[case] date: (i32, u32, u32),
    #[case] time: (u32, u32),
) {
    let next = astronomy::next_moon_phase(&local(0, from, (0, 0)), phase).ok();
    assert_near(local(0, date, time), next, 2);
}

#[rstest]
#[case(EclipseType::PartialLunar, (2021, 8, 29), (2021, 11, 19), (9, 4))]
#[case(EclipseType::TotalLunar, (2021, 8, 29), (2022, 5, 16), (4, 11))]
#[case(EclipseType::Solar, (2023, 10, 15), (2024, 4, 8), (19, 31))]
fn next_eclipse_peak(
    #[case] kind: EclipseType,
    #[case] after: (i32, u32, u32),
    #[case] date: (i32, u32, u32),
    #[case] peak: (u32, u32),
) {
    let location = Location::new(42.0, -70.0).unwrap();
    let eclipse = next_eclipse(&local(0, after, (0, 0)), &location, kind, None).unwrap();
    assert_near(local(0, date, peak), Some(eclipse.peak), 4);
    assert!(eclipse.start <= eclipse.peak && eclipse.peak <= eclipse.end);
    assert!((0.0..=1.0).contains(&eclipse.obscuration));
}

#[rstest]
#[case(-4, (2023, 8, 13), MeteorShower::Perseids)]
#[case(-5, (2023, 12, 14), MeteorShower::Geminids)]
#[case(-5, (2023, 1, 4), MeteorShower::Quadrantids)]
fn meteor_shower_peak_night(
    #[case] offset: i32,
    #[case] date: (i32, u32, u32),
    #[case] shower: MeteorShower,
) {
    let new_york = Location::new(40.7128, -74.0060).unwrap();
    let peak = astronomy::meteor_shower(&new_york, &local(offset, date, (0, 0))).unwrap();
    assert_eq!(peak.shower, shower);
    assert!(astronomy::meteor_shower_altitude(shower, &peak.peak, &new_york) > 0.0);
}

#[rstest]
#[case("Mars", Planet::Mars)]
#[case("neptune", Planet::Neptune)]
fn planet_names(#[case] name: &str, #[case] planet: Planet) {
    assert_eq!(name.parse::<Planet>().unwrap(), planet);
}

#[test]
fn unknown_names_are_errors() {
    assert!(matches!("Vulcan".parse::<Planet>(), Err(SkycalcError::UnknownBody(_))));
    assert!(matches!(Star::named("Krypton"), Err(SkycalcError::UnknownBody(_))));
}

#[test]
fn eclipse_report_serializes() {
    let location = Location::new(42.0, -70.0).unwrap();
    let eclipse = next_eclipse(
        &local(0, (2021, 8, 29), (0, 0)),
        &location,
        EclipseType::PartialLunar,
        Some(Duration::days(365)),
    )
    .unwrap();
    let json = serde_json::to_value(eclipse).unwrap();
    assert!(json["start"].as_str().unwrap().starts_with("2021-11-19T07:"));
    assert!(json["magnitude"].as_f64().unwrap() > 0.9);
}
