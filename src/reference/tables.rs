//! Row types for the historical CSV tables
//!
//! Column names follow the public Ergast database dump. Only the columns used for overrides
//! and career statistics are modeled; the rest are ignored on load.

use serde::Deserialize;

use crate::csv_utils::nullable;
use crate::timing::parse_timedelta;

/// `races.csv`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceRecord {
    pub race_id: u32,
    pub year: i32,
    pub round: u32,
    pub circuit_id: u32,
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub date: Option<String>,
}

/// `drivers.csv`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRecord {
    pub driver_id: u32,
    pub driver_ref: String,
    #[serde(default, deserialize_with = "nullable")]
    pub number: Option<u32>,
    /// Three-letter code; missing for most pre-2000s drivers
    #[serde(default, deserialize_with = "nullable")]
    pub code: Option<String>,
    pub forename: String,
    pub surname: String,
    #[serde(default, deserialize_with = "nullable")]
    pub dob: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub nationality: Option<String>,
    #[serde(default)]
    pub url: String,
}

impl DriverRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.forename, self.surname)
    }
}

/// `pit_stops.csv`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitStopEntry {
    pub race_id: u32,
    pub driver_id: u32,
    pub stop: u32,
    pub lap: u32,
    /// Time of day the stop happened
    #[serde(default, deserialize_with = "nullable")]
    pub time: Option<String>,
    /// Stationary-plus-lane time as text (`"23.227"`, `"16:44.718"` for red flags)
    #[serde(default, deserialize_with = "nullable")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub milliseconds: Option<u64>,
}

impl PitStopEntry {
    /// Duration in seconds, preferring the integer milliseconds column.
    pub fn seconds(&self) -> Option<f64> {
        match self.milliseconds {
            Some(ms) => Some(ms as f64 / 1000.0),
            None => self.duration.as_deref().and_then(parse_timedelta),
        }
    }
}

/// `results.csv`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResultEntry {
    pub race_id: u32,
    pub driver_id: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub position: Option<u32>,
    /// Fastest-lap rank within the race
    #[serde(default, deserialize_with = "nullable")]
    pub rank: Option<u32>,
}

/// `qualifying.csv`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifyingRecord {
    pub race_id: u32,
    pub driver_id: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub position: Option<u32>,
}
