//! # Session Data Model
//!
//! Typed views over what a timing library exposes for one loaded session: the event it
//! belongs to, the classification table, and the per-lap table.
//!
//! Tables are plain `Vec`s of rows in provider order. Keyed access goes through
//! [`ResultsTable`] and [`LapsTable`], which return `Option` on a miss instead of the
//! NaN-on-miss semantics of dataframe indexing.
//!
//! ## Serialized Form
//!
//! Sessions round-trip through YAML with the column names timing libraries use:
//!
//! ```text
//! Event:
//!   EventName: Bahrain Grand Prix
//!   Location: Sakhir
//!   Country: Bahrain
//!   RoundNumber: 1
//! Results:
//!   - DriverNumber: "1"
//!     Abbreviation: VER
//!     Position: 1
//!     Status: Finished
//!     Time: 5504.742
//! Laps:
//!   - DriverNumber: "1"
//!     LapNumber: 1
//!     LapTime: 97.284
//!     Compound: SOFT
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{PaddockError, Result};

pub mod event;
pub mod laps;
pub mod results;

pub use event::EventInfo;
pub use laps::{LapRow, LapsTable};
pub use results::{DriverInfo, ResultRow, ResultsTable};

/// Kind of timed activity within an event weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub enum SessionKind {
    #[serde(rename = "FP1")]
    Practice1,
    #[serde(rename = "FP2")]
    Practice2,
    #[serde(rename = "FP3")]
    Practice3,
    #[serde(rename = "SQ")]
    SprintQualifying,
    #[serde(rename = "S")]
    Sprint,
    #[serde(rename = "Q")]
    Qualifying,
    #[serde(rename = "R")]
    Race,
}

impl SessionKind {
    /// Short identifier used by timing libraries and fixture file names.
    pub fn code(self) -> &'static str {
        match self {
            SessionKind::Practice1 => "FP1",
            SessionKind::Practice2 => "FP2",
            SessionKind::Practice3 => "FP3",
            SessionKind::SprintQualifying => "SQ",
            SessionKind::Sprint => "S",
            SessionKind::Qualifying => "Q",
            SessionKind::Race => "R",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SessionKind {
    type Err = PaddockError;

    fn from_str(s: &str) -> Result<Self> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "fp1" | "practice 1" => SessionKind::Practice1,
            "fp2" | "practice 2" => SessionKind::Practice2,
            "fp3" | "practice 3" => SessionKind::Practice3,
            "sq" | "sprint qualifying" | "sprint shootout" => SessionKind::SprintQualifying,
            "s" | "sprint" => SessionKind::Sprint,
            "q" | "qualifying" => SessionKind::Qualifying,
            "r" | "race" => SessionKind::Race,
            other => {
                return Err(PaddockError::parse("session kind", format!("unknown session '{other}'")));
            }
        };
        Ok(kind)
    }
}

/// One loaded session: event metadata plus result and lap tables.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct Session {
    /// Event the session belongs to
    pub event: EventInfo,
    /// Classification rows, in the order the provider reports entrants
    pub results: Vec<ResultRow>,
    /// Lap rows for every entrant
    pub laps: Vec<LapRow>,
}

impl Session {
    /// Parse a session from YAML.
    pub fn parse(yaml: &str) -> Result<Self> {
        let cleaned = crate::yaml_utils::sanitize_yaml(yaml)?;
        serde_yaml_ng::from_str(&cleaned)
            .map_err(|e| PaddockError::parse("Session deserialization", e))
    }

    /// Entrant numbers in the order the provider reports them.
    pub fn drivers(&self) -> Vec<&str> {
        self.results.iter().map(|row| row.driver_number.as_str()).collect()
    }

    /// Keyed view over the results table.
    pub fn results_table(&self) -> ResultsTable<'_> {
        ResultsTable::new(&self.results)
    }

    /// Keyed view over the laps table.
    pub fn laps_table(&self) -> LapsTable<'_> {
        LapsTable::new(&self.laps)
    }

    /// Identity and team for an entrant number.
    pub fn driver(&self, number: &str) -> Option<DriverInfo> {
        self.results_table().by_number(number).map(DriverInfo::from)
    }
}
