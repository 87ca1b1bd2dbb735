//! Lap-by-lap running order

use serde::Serialize;
use std::collections::BTreeMap;

use super::{NOT_AVAILABLE, display_name, entrant_numbers};
use crate::session::Session;

/// Position of every entrant at the end of every lap.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct PositionMatrix {
    /// `1..=max lap`
    pub laps: Vec<u32>,
    /// Abbreviation → one slot per entry of `laps`
    pub positions: BTreeMap<String, Vec<Option<u32>>>,
    #[serde(rename = "driverNames")]
    pub driver_names: BTreeMap<String, String>,
    #[serde(rename = "teamByAbbr")]
    pub team_by_abbr: BTreeMap<String, String>,
}

/// Build the matrix from the laps table. Entrants without any abbreviation are left out.
pub fn position_matrix(session: &Session) -> PositionMatrix {
    let results = session.results_table();
    let laps_table = session.laps_table();
    let Some(max_lap) = laps_table.max_lap() else {
        return PositionMatrix::default();
    };
    let laps: Vec<u32> = (1..=max_lap).collect();

    let mut matrix = PositionMatrix { laps, ..Default::default() };

    for number in entrant_numbers(session) {
        let driver_laps = laps_table.for_driver(number);
        let abbreviation = results
            .abbreviation_for(number)
            .or_else(|| driver_laps.iter().find_map(|lap| lap.driver.as_deref()));
        let Some(abbreviation) = abbreviation else { continue };
        if matrix.positions.contains_key(abbreviation) {
            continue;
        }

        let mut slots = vec![None; matrix.laps.len()];
        for lap in &driver_laps {
            if let Some(index) = lap.lap().filter(|n| *n >= 1).map(|n| n as usize - 1) {
                if let Some(slot) = slots.get_mut(index) {
                    *slot = lap.running_position();
                }
            }
        }

        let team = session
            .driver(number)
            .and_then(|driver| driver.team_name)
            .or_else(|| driver_laps.iter().find_map(|lap| lap.team.clone()))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        matrix.positions.insert(abbreviation.to_string(), slots);
        matrix.driver_names.insert(abbreviation.to_string(), display_name(session, number));
        matrix.team_by_abbr.insert(abbreviation.to_string(), team);
    }

    matrix
}
