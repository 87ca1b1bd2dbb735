//! Event metadata
//!
//! The per-weekend record a timing library attaches to every session.

use serde::{Deserialize, Serialize};

/// Event metadata for a session
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct EventInfo {
    /// Event name ("Bahrain Grand Prix")
    pub event_name: String,
    /// Town or area of the venue
    pub location: String,
    /// Host country
    pub country: String,
    /// Sponsor-laden official title
    pub official_event_name: Option<String>,
    /// Championship round
    pub round_number: Option<u32>,
    /// Circuit name, when the provider knows it
    pub circuit: Option<String>,
}
