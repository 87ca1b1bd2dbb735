//! Per-lap table
//!
//! Pit timestamps follow timing-feed conventions: `PitInTime` is stamped on the in-lap and
//! `PitOutTime` on the following out-lap. Both are session timestamps, not durations.

use serde::{Deserialize, Serialize};

use super::results::{string_or_number, whole_number};
use crate::timing::RawDuration;

/// Individual lap row
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct LapRow {
    /// Car number, as text
    #[serde(deserialize_with = "string_or_number")]
    pub driver_number: String,
    /// Three-letter driver code
    pub driver: Option<String>,
    /// Team name
    pub team: Option<String>,
    /// Lap number (float in timing feeds)
    pub lap_number: Option<f64>,
    /// Lap time
    pub lap_time: Option<RawDuration>,
    /// Session time the car crossed the pit entry
    pub pit_in_time: Option<RawDuration>,
    /// Session time the car left the pit exit
    pub pit_out_time: Option<RawDuration>,
    /// Tyre compound ("SOFT", "MEDIUM", ...)
    pub compound: Option<String>,
    /// Running position at the end of the lap
    pub position: Option<f64>,
}

impl LapRow {
    pub fn lap(&self) -> Option<u32> {
        self.lap_number.and_then(whole_number)
    }

    pub fn lap_seconds(&self) -> Option<f64> {
        self.lap_time.as_ref().and_then(RawDuration::seconds)
    }

    pub fn pit_in_seconds(&self) -> Option<f64> {
        self.pit_in_time.as_ref().and_then(RawDuration::seconds)
    }

    pub fn pit_out_seconds(&self) -> Option<f64> {
        self.pit_out_time.as_ref().and_then(RawDuration::seconds)
    }

    pub fn running_position(&self) -> Option<u32> {
        self.position.and_then(whole_number)
    }
}

/// Keyed view over a laps table.
#[derive(Debug, Clone, Copy)]
pub struct LapsTable<'a> {
    rows: &'a [LapRow],
}

impl<'a> LapsTable<'a> {
    pub fn new(rows: &'a [LapRow]) -> Self {
        Self { rows }
    }

    /// An entrant's laps, ordered by lap number.
    pub fn for_driver(&self, number: &str) -> Vec<&'a LapRow> {
        let mut laps: Vec<&LapRow> =
            self.rows.iter().filter(|row| row.driver_number == number).collect();
        laps.sort_by_key(|row| row.lap().unwrap_or(u32::MAX));
        laps
    }

    /// Number of lap rows attributed to an entrant.
    pub fn count_for(&self, number: &str) -> usize {
        self.rows.iter().filter(|row| row.driver_number == number).count()
    }

    /// Mean lap time in seconds, ignoring laps without a time.
    pub fn average_seconds(&self, number: &str) -> Option<f64> {
        let times = self.lap_times(number);
        if times.is_empty() {
            return None;
        }
        Some(times.iter().sum::<f64>() / times.len() as f64)
    }

    /// Shortest lap time in seconds.
    pub fn fastest_seconds(&self, number: &str) -> Option<f64> {
        self.lap_times(number).into_iter().reduce(f64::min)
    }

    /// The quickest timed lap of the whole session.
    pub fn fastest(&self) -> Option<&'a LapRow> {
        self.rows
            .iter()
            .filter_map(|row| row.lap_seconds().map(|secs| (secs, row)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, row)| row)
    }

    /// Highest lap number present.
    pub fn max_lap(&self) -> Option<u32> {
        self.rows.iter().filter_map(LapRow::lap).max()
    }

    fn lap_times(&self, number: &str) -> Vec<f64> {
        self.rows
            .iter()
            .filter(|row| row.driver_number == number)
            .filter_map(LapRow::lap_seconds)
            .collect()
    }
}
