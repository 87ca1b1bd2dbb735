//! Classification table
//!
//! One [`ResultRow`] per entrant. Timing libraries key this table two ways, by the
//! three-letter abbreviation and by the car number, so [`ResultsTable`] indexes both.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::timing::{RawDuration, safe_seconds};

/// Individual classification row
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct ResultRow {
    /// Car number, as text
    #[serde(deserialize_with = "string_or_number")]
    pub driver_number: String,
    /// Three-letter driver code
    pub abbreviation: Option<String>,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Team name
    pub team_name: Option<String>,
    /// Classified position (timing libraries report it as a float, NaN when unclassified)
    pub position: Option<f64>,
    /// Starting grid slot; 0 means pit-lane start
    pub grid_position: Option<f64>,
    /// Classification status ("Finished", "+1 Lap", "Engine", ...)
    pub status: Option<String>,
    /// Race time: absolute for the winner, gap to the winner for everyone else
    pub time: Option<RawDuration>,
    /// First qualifying segment
    #[serde(rename = "Q1")]
    pub q1: Option<RawDuration>,
    /// Second qualifying segment
    #[serde(rename = "Q2")]
    pub q2: Option<RawDuration>,
    /// Third qualifying segment
    #[serde(rename = "Q3")]
    pub q3: Option<RawDuration>,
}

impl ResultRow {
    /// Classified position, if the entrant was classified.
    pub fn classified_position(&self) -> Option<u32> {
        self.position.and_then(whole_number)
    }

    /// Starting grid slot.
    pub fn grid(&self) -> Option<u32> {
        self.grid_position.and_then(whole_number)
    }
}

/// Identity fields of one entrant, as a timing library's driver lookup returns them.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub team_name: Option<String>,
    pub abbreviation: Option<String>,
    pub grid_position: Option<u32>,
}

impl DriverInfo {
    /// "First Last", skipping whichever half is missing.
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<&ResultRow> for DriverInfo {
    fn from(row: &ResultRow) -> Self {
        Self {
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            team_name: row.team_name.clone(),
            abbreviation: row.abbreviation.clone(),
            grid_position: row.grid(),
        }
    }
}

/// Keyed view over a results table.
#[derive(Debug)]
pub struct ResultsTable<'a> {
    rows: &'a [ResultRow],
    by_abbreviation: HashMap<&'a str, &'a ResultRow>,
    by_number: HashMap<&'a str, &'a ResultRow>,
}

impl<'a> ResultsTable<'a> {
    /// Index the rows; the first row wins when a key repeats.
    pub fn new(rows: &'a [ResultRow]) -> Self {
        let mut by_abbreviation = HashMap::with_capacity(rows.len());
        let mut by_number = HashMap::with_capacity(rows.len());

        for row in rows {
            if let Some(abbreviation) = row.abbreviation.as_deref() {
                by_abbreviation.entry(abbreviation).or_insert(row);
            }
            by_number.entry(row.driver_number.as_str()).or_insert(row);
        }

        Self { rows, by_abbreviation, by_number }
    }

    /// Row for a three-letter code.
    pub fn by_abbreviation(&self, abbreviation: &str) -> Option<&'a ResultRow> {
        self.by_abbreviation.get(abbreviation).copied()
    }

    /// Row for a car number.
    pub fn by_number(&self, number: &str) -> Option<&'a ResultRow> {
        self.by_number.get(number).copied()
    }

    /// Three-letter code for a car number.
    pub fn abbreviation_for(&self, number: &str) -> Option<&'a str> {
        self.by_number(number).and_then(|row| row.abbreviation.as_deref())
    }

    /// Rows in provider order.
    pub fn rows(&self) -> &'a [ResultRow] {
        self.rows
    }
}

pub(crate) fn whole_number(value: f64) -> Option<u32> {
    safe_seconds(value).filter(|v| *v >= 0.0 && *v <= u32::MAX as f64).map(|v| v as u32)
}

/// Accept car numbers written either as YAML strings or integers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(text) => text,
        Loose::Integer(value) => value.to_string(),
        Loose::Float(value) => format!("{value}"),
    })
}
