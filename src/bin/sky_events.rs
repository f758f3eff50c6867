//! Report of the sky for one day at one place
//!
//! Prints sun and moon events, twilight, the moon phase, planet rise and
//! set, any meteor shower peaking that night and the next eclipses.
//!
//! Usage:
//!   cargo run --bin sky_events -- --latitude 40.71 --longitude -74.01 --date 2024-04-08 --offset -4
//!   cargo run --bin sky_events -- --latitude 40.71 --longitude -74.01 --json

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use clap::{ArgAction, Parser};
use serde::Serialize;

use skycalc::almanac::{RiseSetTransitTimes, SunTimesMode};
use skycalc::astronomy::{self, MeteorShowerPeak, Season};
use skycalc::celestial::MoonPhase;
use skycalc::eclipse::{self, Eclipse, EclipseType};
use skycalc::planetlib::Planet;
use skycalc::Location;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Sun, moon, planet, meteor and eclipse events for a day
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Latitude in degrees, north positive
    #[arg(long, allow_hyphen_values = true)]
    latitude: f64,

    /// Longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true)]
    longitude: f64,

    /// Local date (YYYY-MM-DD), today if omitted
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Offset of local time from UTC in hours
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    offset: f64,

    /// Print the report as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct PlanetEvents {
    planet: Planet,
    #[serde(flatten)]
    events: RiseSetTransitTimes,
}

#[derive(Debug, Serialize)]
struct DayReport {
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
    season: Season,
    sun: RiseSetTransitTimes,
    civil_twilight: RiseSetTransitTimes,
    astronomical_twilight: RiseSetTransitTimes,
    daylight_minutes: i64,
    moon: RiseSetTransitTimes,
    moon_phase: MoonPhase,
    super_moon: bool,
    planets: Vec<PlanetEvents>,
    meteor_shower: Option<MeteorShowerPeak>,
    next_lunar_eclipse: Option<Eclipse>,
    next_solar_eclipse: Option<Eclipse>,
}

impl DayReport {
    fn build(location: &Location, noon: &DateTime<FixedOffset>) -> Self {
        let start_of_day = *noon - Duration::hours(12);
        Self {
            date: noon.date_naive(),
            latitude: location.latitude(),
            longitude: location.longitude(),
            season: astronomy::season(location, noon),
            sun: astronomy::sun_events(noon, location, SunTimesMode::Actual, false),
            civil_twilight: astronomy::sun_events(noon, location, SunTimesMode::Civil, false),
            astronomical_twilight: astronomy::sun_events(
                noon,
                location,
                SunTimesMode::Astronomical,
                false,
            ),
            daylight_minutes: astronomy::daylight_length(noon, location, SunTimesMode::Actual)
                .num_minutes(),
            moon: astronomy::moon_events(noon, location, false),
            moon_phase: astronomy::moon_phase(noon),
            super_moon: astronomy::is_super_moon(noon),
            planets: Planet::VISIBLE
                .into_iter()
                .map(|planet| PlanetEvents {
                    planet,
                    events: astronomy::planet_events(planet, noon, location, false),
                })
                .collect(),
            meteor_shower: astronomy::meteor_shower(location, noon),
            next_lunar_eclipse: eclipse::next_eclipse(
                &start_of_day,
                location,
                EclipseType::PartialLunar,
                None,
            ),
            next_solar_eclipse: eclipse::next_eclipse(
                &start_of_day,
                location,
                EclipseType::Solar,
                None,
            ),
        }
    }

    fn print(&self) {
        println!(
            "Sky for {} at {:.4}, {:.4} ({:?})",
            self.date, self.latitude, self.longitude, self.season
        );
        println!();
        print_events("Sun", &self.sun);
        print_events("Civil twilight", &self.civil_twilight);
        print_events("Astro twilight", &self.astronomical_twilight);
        println!(
            "{:<16}{}h {:02}m",
            "Daylight",
            self.daylight_minutes / 60,
            self.daylight_minutes % 60
        );
        println!();
        print_events("Moon", &self.moon);
        println!(
            "{:<16}{} ({:.0}% lit){}",
            "Phase",
            self.moon_phase.phase.name(),
            self.moon_phase.illumination,
            if self.super_moon { ", supermoon" } else { "" }
        );
        println!();
        for planet in &self.planets {
            print_events(planet.planet.name(), &planet.events);
        }
        println!();

        match &self.meteor_shower {
            Some(peak) => println!(
                "{:<16}{} peaks at {}, visible {} to {}",
                "Meteor shower",
                peak.shower,
                peak.peak.format("%H:%M"),
                peak.start.format("%H:%M"),
                peak.end.format("%H:%M"),
            ),
            None => println!("{:<16}none", "Meteor shower"),
        }
        print_eclipse("Lunar eclipse", &self.next_lunar_eclipse);
        print_eclipse("Solar eclipse", &self.next_solar_eclipse);
    }
}

fn format_time(time: Option<DateTime<FixedOffset>>) -> String {
    time.map_or_else(|| "--:--".to_string(), |t| t.format("%H:%M").to_string())
}

fn print_events(label: &str, events: &RiseSetTransitTimes) {
    println!(
        "{:<16}rise {}  transit {}  set {}",
        label,
        format_time(events.rise),
        format_time(events.transit),
        format_time(events.set)
    );
}

fn print_eclipse(label: &str, eclipse: &Option<Eclipse>) {
    match eclipse {
        Some(eclipse) => println!(
            "{:<16}{} to {}, magnitude {:.3}, {:.0}% obscured",
            label,
            eclipse.start.format("%Y-%m-%d %H:%M"),
            eclipse.end.format("%Y-%m-%d %H:%M"),
            eclipse.magnitude,
            eclipse.obscuration * 100.0
        ),
        None => println!("{:<16}none visible", label),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let location = Location::new(args.latitude, args.longitude)?;
    let offset = FixedOffset::east_opt((args.offset * 3600.0).round() as i32)
        .ok_or_else(|| format!("offset out of range: {} hours", args.offset))?;
    let date = args.date.unwrap_or_else(|| Utc::now().with_timezone(&offset).date_naive());
    let noon = date
        .and_hms_opt(12, 0, 0)
        .and_then(|noon| noon.and_local_timezone(offset).single())
        .ok_or("invalid local noon")?;

    let report = DayReport::build(&location, &noon);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }
    Ok(())
}
