//! Circuit detail payload: event context, matched circuit record, fastest laps

use serde::Serialize;

use crate::circuit::{CircuitRecord, CircuitResolver};
use crate::session::Session;
use crate::timing::DurationMode;

/// What the caller asked for, echoed back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct RequestedEvent {
    pub year: i32,
    pub gp_name: String,
}

/// Event metadata from the session provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct EventContext {
    pub event_name: String,
    pub event_location: String,
    pub event_country: String,
    pub event_official_name: Option<String>,
    pub event_round: Option<u32>,
    #[serde(rename = "circuit_name_fastf1")]
    pub provider_circuit_name: Option<String>,
}

impl EventContext {
    pub fn from_session(session: &Session) -> Self {
        let event = &session.event;
        Self {
            event_name: event.event_name.clone(),
            event_location: event.location.clone(),
            event_country: event.country.clone(),
            event_official_name: event.official_event_name.clone(),
            event_round: event.round_number,
            provider_circuit_name: event.circuit.clone(),
        }
    }
}

/// Reference record as the frontend reads it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct CircuitDetails {
    #[serde(rename = "circuitId")]
    pub circuit_id: u32,
    #[serde(rename = "circuitRef")]
    pub circuit_ref: String,
    pub name: String,
    pub location: String,
    pub country: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub alt: Option<f64>,
    pub wiki_url: String,
    pub length_km: Option<f64>,
    pub turns: Option<u32>,
    pub layout_img_url: Option<String>,
    /// `"Monza, Italy"`
    pub display_location: String,
}

impl From<&CircuitRecord> for CircuitDetails {
    fn from(record: &CircuitRecord) -> Self {
        Self {
            circuit_id: record.circuit_id,
            circuit_ref: record.circuit_ref.clone(),
            name: record.name.clone(),
            location: record.location.clone(),
            country: record.country.clone(),
            lat: record.latitude,
            lng: record.longitude,
            alt: record.altitude,
            wiki_url: record.wiki_url.clone(),
            length_km: record.length_km,
            turns: record.turns,
            layout_img_url: record.layout_img_url.clone(),
            display_location: record.display_location(),
        }
    }
}

/// Quickest lap of one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct FastestLap {
    pub driver: Option<String>,
    pub team: Option<String>,
    pub time: Option<String>,
    pub lap_number: Option<u32>,
}

impl FastestLap {
    /// Fastest timed lap of a session, `None` when nobody set a time.
    pub fn of(session: &Session) -> Option<Self> {
        let lap = session.laps_table().fastest()?;
        Some(Self {
            driver: lap.driver.clone(),
            team: lap.team.clone(),
            time: lap.lap_time.as_ref().and_then(|t| t.normalized(false, DurationMode::Lap)),
            lap_number: lap.lap(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct FastestLaps {
    pub fastest_qual: Option<FastestLap>,
    pub fastest_race: Option<FastestLap>,
}

/// Circuit detail payload. `circuit` is `null` when no reference record matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct CircuitPayload {
    pub requested_gp: RequestedEvent,
    pub event: EventContext,
    pub csv_match_found: bool,
    pub circuit: Option<CircuitDetails>,
    pub fastest_laps: FastestLaps,
}

/// Combine event context, the resolved circuit and both sessions' fastest laps.
///
/// Event context comes from the race session. A qualifying session that could not be
/// loaded just leaves `fastest_qual` empty.
pub fn circuit_payload(
    year: i32,
    gp_name: &str,
    race: &Session,
    qualifying: Option<&Session>,
    resolver: &CircuitResolver,
) -> CircuitPayload {
    let event = EventContext::from_session(race);
    let circuit = resolver
        .resolve(&event.event_name, &event.event_location, &event.event_country)
        .map(CircuitDetails::from);

    CircuitPayload {
        requested_gp: RequestedEvent { year, gp_name: gp_name.to_string() },
        csv_match_found: circuit.is_some(),
        circuit,
        event,
        fastest_laps: FastestLaps {
            fastest_qual: qualifying.and_then(FastestLap::of),
            fastest_race: FastestLap::of(race),
        },
    }
}
