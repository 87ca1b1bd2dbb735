//! Pit stops derived from lap timestamps, with reference-data overrides

use serde::Serialize;
use std::collections::BTreeMap;

use super::{EventHeader, NOT_AVAILABLE, display_name, entrant_numbers};
use crate::reference::ReferenceData;
use crate::session::{LapRow, Session};
use crate::timing::round_millis;

/// Shown instead of an empty table.
pub const NO_PIT_DATA: &str = "No pit stop data available";

/// One pit stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct PitStopRecord {
    pub driver_number: String,
    pub driver_name: String,
    /// In-lap number
    pub lap: u32,
    /// Seconds, 3 decimals; recorded reference value when one exists
    #[serde(rename = "pit_stop_time")]
    pub duration_seconds: Option<f64>,
    pub tyre_before: Option<String>,
    pub tyre_after: Option<String>,
}

/// Pit stop payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct PitStopsPayload {
    #[serde(flatten)]
    pub header: EventHeader,
    pub pitstops: Vec<PitStopRecord>,
    /// Driver name → team
    #[serde(rename = "teamByDriver")]
    pub team_by_driver: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Every lap with a pit-in stamp, grouped by entrant in provider order.
///
/// `year` keys the reference lookup together with the event name; pass `None` for
/// `reference` to use timestamp deltas only.
pub fn pit_stops(session: &Session, year: i32, reference: Option<&ReferenceData>) -> Vec<PitStopRecord> {
    let results = session.results_table();
    let laps = session.laps_table();
    let mut stops = Vec::new();

    for number in entrant_numbers(session) {
        let driver_laps = laps.for_driver(number);
        let driver_name = display_name(session, number);
        let abbreviation = results
            .abbreviation_for(number)
            .or_else(|| driver_laps.iter().find_map(|lap| lap.driver.as_deref()));

        for (index, lap) in driver_laps.iter().enumerate() {
            let Some(pit_in) = lap.pit_in_seconds() else { continue };
            let Some(lap_number) = lap.lap() else { continue };

            let previous = index.checked_sub(1).and_then(|i| driver_laps.get(i));
            let next = driver_laps.get(index + 1);

            let recorded = reference.zip(abbreviation).and_then(|(reference, abbreviation)| {
                reference.pit_duration(year, &session.event.event_name, abbreviation, lap_number)
            });

            stops.push(PitStopRecord {
                driver_number: number.to_string(),
                driver_name: driver_name.clone(),
                lap: lap_number,
                duration_seconds: recorded.or_else(|| lane_time(pit_in, lap, next.copied())).map(round_millis),
                tyre_before: previous.and_then(|l| l.compound.clone()),
                tyre_after: next.and_then(|l| l.compound.clone()),
            });
        }
    }

    stops
}

/// Pit stops with the event header and team lookup.
pub fn pit_stops_payload(session: &Session, year: i32, reference: Option<&ReferenceData>) -> PitStopsPayload {
    let pitstops = pit_stops(session, year, reference);

    let mut team_by_driver = BTreeMap::new();
    for number in session.drivers() {
        let team = session.driver(number).and_then(|d| d.team_name);
        team_by_driver
            .entry(display_name(session, number))
            .or_insert_with(|| team.unwrap_or_else(|| NOT_AVAILABLE.to_string()));
    }

    let message = pitstops.is_empty().then(|| NO_PIT_DATA.to_string());
    PitStopsPayload { header: EventHeader::from_session(session), pitstops, team_by_driver, message }
}

/// Pit-out minus pit-in, using the first pit-out stamped after this pit-in.
///
/// Pit-out is usually stamped on the out-lap. A same-row pit-out earlier than the pit-in
/// belongs to the previous stop (back-to-back stops).
fn lane_time(pit_in: f64, lap: &LapRow, next: Option<&LapRow>) -> Option<f64> {
    let pit_out = lap
        .pit_out_seconds()
        .filter(|out| *out >= pit_in)
        .or_else(|| next.and_then(LapRow::pit_out_seconds))?;
    let delta = pit_out - pit_in;
    (delta >= 0.0).then_some(delta)
}
