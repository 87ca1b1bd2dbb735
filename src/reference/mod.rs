//! # Historical Reference Data
//!
//! Static tables in the Ergast dump layout, loaded once by the embedding application and
//! shared read-only. Two things use them:
//!
//! - **Pit-stop overrides**: a recorded stop for `(race, driver, lap)` replaces the
//!   duration derived from provider timestamps.
//! - **Driver profiles**: identity and career statistics.
//!
//! Every table is optional. A directory with no `pit_stops.csv` simply yields no overrides.
//!
//! ```text
//! {reference_dir}/
//!   races.csv        raceId, year, round, circuitId, name, ...
//!   drivers.csv      driverId, driverRef, number, code, forename, surname, dob, nationality, url
//!   pit_stops.csv    raceId, driverId, stop, lap, time, duration, milliseconds
//!   results.csv      raceId, driverId, position, rank, ...
//!   qualifying.csv   raceId, driverId, position, ...
//! ```

use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::Result;
use crate::circuit::normalize_key;
use crate::csv_utils::read_optional_file;

pub mod tables;

pub use tables::{DriverRecord, PitStopEntry, QualifyingRecord, RaceRecord, RaceResultEntry};

/// Counted career achievements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct CareerStats {
    pub wins: u32,
    pub podiums: u32,
    pub pole_positions: u32,
    pub fastest_laps: u32,
}

/// Indexed reference tables.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    races: Vec<RaceRecord>,
    drivers: Vec<DriverRecord>,
    results: Vec<RaceResultEntry>,
    qualifying: Vec<QualifyingRecord>,
    pit_durations: HashMap<(u32, u32, u32), f64>,
}

impl ReferenceData {
    /// Load every table present in `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let data = Self::from_tables(
            read_optional_file(&dir.join("races.csv"))?,
            read_optional_file(&dir.join("drivers.csv"))?,
            read_optional_file(&dir.join("pit_stops.csv"))?,
            read_optional_file(&dir.join("results.csv"))?,
            read_optional_file(&dir.join("qualifying.csv"))?,
        );

        info!(
            dir = %dir.display(),
            races = data.races.len(),
            drivers = data.drivers.len(),
            pit_stops = data.pit_durations.len(),
            results = data.results.len(),
            qualifying = data.qualifying.len(),
            "Loaded reference data"
        );
        Ok(data)
    }

    /// Build from already-parsed tables.
    pub fn from_tables(
        races: Vec<RaceRecord>,
        drivers: Vec<DriverRecord>,
        pit_stops: Vec<PitStopEntry>,
        results: Vec<RaceResultEntry>,
        qualifying: Vec<QualifyingRecord>,
    ) -> Self {
        let mut pit_durations = HashMap::with_capacity(pit_stops.len());
        for stop in &pit_stops {
            if let Some(seconds) = stop.seconds() {
                pit_durations.entry((stop.race_id, stop.driver_id, stop.lap)).or_insert(seconds);
            }
        }

        Self { races, drivers, results, qualifying, pit_durations }
    }

    /// Race id for a season and event name. Exact names first, then normalized equality.
    pub fn race_id(&self, year: i32, event_name: &str) -> Option<u32> {
        let season = || self.races.iter().filter(move |race| race.year == year);

        season()
            .find(|race| race.name == event_name)
            .or_else(|| {
                let wanted = normalize_key(event_name);
                season().find(|race| normalize_key(&race.name) == wanted)
            })
            .map(|race| race.race_id)
    }

    /// Driver id for a three-letter code.
    ///
    /// Codes are reused across eras (`MSC`, `VER`); when a race is given, the driver who
    /// took part in it wins.
    pub fn driver_id_for_code(&self, code: &str, race_id: Option<u32>) -> Option<u32> {
        let candidates: Vec<&DriverRecord> = self
            .drivers
            .iter()
            .filter(|driver| driver.code.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(code)))
            .collect();

        if candidates.len() > 1 {
            if let Some(race_id) = race_id {
                let entered = candidates.iter().find(|driver| {
                    self.results.iter().any(|r| r.race_id == race_id && r.driver_id == driver.driver_id)
                });
                if let Some(driver) = entered {
                    return Some(driver.driver_id);
                }
            }
        }

        candidates.first().map(|driver| driver.driver_id)
    }

    /// Recorded pit-stop duration for `(event, abbreviation, lap)`, in seconds.
    pub fn pit_duration(&self, year: i32, event_name: &str, abbreviation: &str, lap: u32) -> Option<f64> {
        let race_id = self.race_id(year, event_name)?;
        let driver_id = self.driver_id_for_code(abbreviation, Some(race_id))?;
        let seconds = self.pit_durations.get(&(race_id, driver_id, lap)).copied();
        if seconds.is_some() {
            debug!(year, event = event_name, driver = abbreviation, lap, "Using reference pit duration");
        }
        seconds
    }

    /// Find a driver by full name ("Lewis Hamilton") or by driverRef ("hamilton").
    pub fn find_driver(&self, name: &str) -> Option<&DriverRecord> {
        let wanted = normalize_key(name);
        if wanted.is_empty() {
            return None;
        }

        self.drivers
            .iter()
            .find(|driver| normalize_key(&driver.full_name()) == wanted)
            .or_else(|| self.drivers.iter().find(|driver| driver.driver_ref.eq_ignore_ascii_case(name.trim())))
    }

    /// Wins, podiums, poles and fastest laps for a driver.
    pub fn career_stats(&self, driver_id: u32) -> CareerStats {
        let mut stats = CareerStats::default();

        for result in self.results.iter().filter(|r| r.driver_id == driver_id) {
            match result.position {
                Some(1) => {
                    stats.wins += 1;
                    stats.podiums += 1;
                }
                Some(2 | 3) => stats.podiums += 1,
                _ => {}
            }
            if result.rank == Some(1) {
                stats.fastest_laps += 1;
            }
        }

        stats.pole_positions = self
            .qualifying
            .iter()
            .filter(|q| q.driver_id == driver_id && q.position == Some(1))
            .count() as u32;

        stats
    }

    pub fn races(&self) -> &[RaceRecord] {
        &self.races
    }

    pub fn drivers(&self) -> &[DriverRecord] {
        &self.drivers
    }

    pub fn is_empty(&self) -> bool {
        self.races.is_empty() && self.drivers.is_empty() && self.pit_durations.is_empty()
    }
}
