//! # Payload Assembly
//!
//! Turns loaded [`Session`]s into the JSON payloads the frontend consumes, one module per
//! endpoint category:
//!
//! | module         | payload                         |
//! |----------------|---------------------------------|
//! | [`race`]       | [`RaceSummary`], [`RaceList`]   |
//! | [`qualifying`] | [`QualifyingSummary`]           |
//! | [`pit_stops`]  | [`PitStopsPayload`]             |
//! | [`positions`]  | [`PositionMatrix`]              |
//! | [`circuit`]    | [`CircuitPayload`]              |
//! | [`driver`]     | [`DriverProfile`]               |
//!
//! Every time field goes through [`crate::timing`]; every numeric field is `Option` and
//! serializes as `null` when the provider had nothing. Text identity fields that miss a
//! lookup carry [`NOT_AVAILABLE`].

use serde::Serialize;

use crate::session::Session;

pub mod circuit;
pub mod driver;
pub mod pit_stops;
pub mod positions;
pub mod qualifying;
pub mod race;

pub use circuit::{CircuitDetails, CircuitPayload, EventContext, FastestLap, FastestLaps, RequestedEvent};
pub use driver::DriverProfile;
pub use pit_stops::{PitStopRecord, PitStopsPayload};
pub use positions::PositionMatrix;
pub use qualifying::{QualifyingEntry, QualifyingSummary};
pub use race::{EntrantResult, RaceList, RaceSummary};

/// Sentinel for text identity fields a lookup could not fill.
pub const NOT_AVAILABLE: &str = "N/A";

/// Event identity carried by every event-scoped payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct EventHeader {
    /// Event name ("Bahrain Grand Prix")
    pub circuit: String,
    pub location: String,
    pub country: String,
}

impl EventHeader {
    pub fn from_session(session: &Session) -> Self {
        Self {
            circuit: session.event.event_name.clone(),
            location: session.event.location.clone(),
            country: session.event.country.clone(),
        }
    }
}

/// Entrant numbers in provider order, followed by any that only appear in the laps table.
pub(crate) fn entrant_numbers(session: &Session) -> Vec<&str> {
    let mut numbers = session.drivers();
    for lap in &session.laps {
        if !numbers.contains(&lap.driver_number.as_str()) {
            numbers.push(lap.driver_number.as_str());
        }
    }
    numbers
}

/// `"First Last"`, or the sentinel when the provider has no name.
pub(crate) fn display_name(session: &Session, number: &str) -> String {
    session
        .driver(number)
        .map(|driver| driver.full_name())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
