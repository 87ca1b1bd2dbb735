//! Qualifying summary

use serde::Serialize;

use super::{EventHeader, NOT_AVAILABLE, display_name};
use crate::session::Session;
use crate::timing::{DurationMode, RawDuration};

/// One qualifying classification row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct QualifyingEntry {
    pub position: Option<u32>,
    pub driver_number: String,
    pub driver_name: String,
    pub abbreviation: String,
    pub team: String,
    pub q1: Option<String>,
    pub q2: Option<String>,
    pub q3: Option<String>,
}

/// Qualifying payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct QualifyingSummary {
    #[serde(flatten)]
    pub header: EventHeader,
    pub qualifying_results: Vec<QualifyingEntry>,
}

/// One entry per result row, in provider order; segment times in lap mode.
pub fn qualifying_summary(session: &Session) -> QualifyingSummary {
    let qualifying_results = session
        .results
        .iter()
        .map(|row| QualifyingEntry {
            position: row.classified_position(),
            driver_number: row.driver_number.clone(),
            driver_name: display_name(session, &row.driver_number),
            abbreviation: row.abbreviation.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            team: row.team_name.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            q1: segment(row.q1.as_ref()),
            q2: segment(row.q2.as_ref()),
            q3: segment(row.q3.as_ref()),
        })
        .collect();

    QualifyingSummary { header: EventHeader::from_session(session), qualifying_results }
}

fn segment(time: Option<&RawDuration>) -> Option<String> {
    time.and_then(|time| time.normalized(false, DurationMode::Lap))
}
