//! Race summary and season list

use serde::Serialize;

use super::{EventHeader, NOT_AVAILABLE, display_name};
use crate::session::{ResultRow, Session};
use crate::timing::{DurationMode, normalize_seconds};

/// One entrant's race, as shown in the results table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct EntrantResult {
    pub driver_number: String,
    pub driver_name: String,
    pub abbreviation: String,
    pub team: String,
    /// Lap rows recorded for the entrant
    pub laps: u32,
    #[serde(rename = "avg_laptime")]
    pub average_lap_time: Option<String>,
    #[serde(rename = "fastest_lap")]
    pub fastest_lap_time: Option<String>,
    /// Leader: elapsed time. Other finishers: `+gap`. Everyone else: status text.
    pub total_time: Option<String>,
    pub status: String,
    /// Classified position; `null` when unclassified
    pub position: Option<u32>,
    pub grid_position: Option<u32>,
}

/// Race results payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct RaceSummary {
    #[serde(flatten)]
    pub header: EventHeader,
    pub results: Vec<EntrantResult>,
}

/// Event names for a season.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct RaceList {
    pub year: i32,
    pub races: Vec<String>,
}

/// One [`EntrantResult`] per entrant, in the provider's entrant order.
pub fn assemble(session: &Session) -> Vec<EntrantResult> {
    let results = session.results_table();
    let laps = session.laps_table();

    session
        .drivers()
        .into_iter()
        .map(|number| {
            let abbreviation = results.abbreviation_for(number);
            let classification = abbreviation.and_then(|abbr| results.by_abbreviation(abbr));
            let driver = session.driver(number);

            EntrantResult {
                driver_number: number.to_string(),
                driver_name: display_name(session, number),
                abbreviation: abbreviation.unwrap_or(NOT_AVAILABLE).to_string(),
                team: driver
                    .and_then(|d| d.team_name)
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                laps: laps.count_for(number) as u32,
                average_lap_time: normalize_seconds(laps.average_seconds(number), false, DurationMode::Lap),
                fastest_lap_time: normalize_seconds(laps.fastest_seconds(number), false, DurationMode::Lap),
                total_time: classification.and_then(total_time),
                status: classification
                    .and_then(|row| row.status.clone())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                position: classification.and_then(ResultRow::classified_position),
                grid_position: results.by_number(number).and_then(ResultRow::grid),
            }
        })
        .collect()
}

/// Race results with the event header.
pub fn race_summary(session: &Session) -> RaceSummary {
    RaceSummary { header: EventHeader::from_session(session), results: assemble(session) }
}

/// Elapsed time for the winner, `+gap` for other finishers, status text otherwise.
fn total_time(row: &ResultRow) -> Option<String> {
    let status = row.status.as_deref();
    let finished = status.is_none_or(|s| s == "Finished" || s.starts_with('+'));

    if finished {
        let is_gap = row.classified_position() != Some(1);
        let time = row.time.as_ref().and_then(|t| t.normalized(is_gap, DurationMode::Total));
        if time.is_some() {
            return time;
        }
    }

    status.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_race;
    use crate::timing::RawDuration;
    use proptest::prelude::*;

    fn by_number<'a>(results: &'a [EntrantResult], number: &str) -> &'a EntrantResult {
        results.iter().find(|r| r.driver_number == number).expect("entrant present")
    }

    #[test]
    fn one_result_per_entrant_in_provider_order() {
        let _ = tracing_subscriber::fmt::try_init();
        let session = sample_race();
        let results = assemble(&session);

        let order: Vec<&str> = results.iter().map(|r| r.driver_number.as_str()).collect();
        assert_eq!(order, vec!["1", "11", "16", "2"]);
    }

    #[test]
    fn leader_gap_and_non_finishers() {
        let results = assemble(&sample_race());

        assert_eq!(by_number(&results, "1").total_time.as_deref(), Some("1:31:44.742"));
        assert_eq!(by_number(&results, "11").total_time.as_deref(), Some("+0:00:22.457"));
        assert_eq!(by_number(&results, "16").total_time.as_deref(), Some("+1 Lap"));
        assert_eq!(by_number(&results, "2").total_time.as_deref(), Some("Retired"));
    }

    #[test]
    fn lap_statistics() {
        let results = assemble(&sample_race());

        let ver = by_number(&results, "1");
        assert_eq!(ver.laps, 3);
        assert_eq!(ver.average_lap_time.as_deref(), Some("1:37.232"));
        assert_eq!(ver.fastest_lap_time.as_deref(), Some("1:35.912"));

        let lec = by_number(&results, "16");
        assert_eq!(lec.laps, 3);
        assert_eq!(lec.fastest_lap_time.as_deref(), Some("1:37.800"));

        let sar = by_number(&results, "2");
        assert_eq!(sar.laps, 1);
        assert_eq!(sar.average_lap_time, None);
        assert_eq!(sar.fastest_lap_time, None);
    }

    #[test]
    fn identity_and_classification() {
        let results = assemble(&sample_race());

        let per = by_number(&results, "11");
        assert_eq!(per.driver_name, "Sergio Perez");
        assert_eq!(per.abbreviation, "PER");
        assert_eq!(per.team, "Red Bull Racing");
        assert_eq!(per.position, Some(2));
        assert_eq!(per.grid_position, Some(5));

        let sar = by_number(&results, "2");
        assert_eq!(sar.position, None);
        assert_eq!(sar.status, "Retired");
    }

    #[test]
    fn missing_lookups_use_sentinels() {
        let mut session = sample_race();
        session.results[3].abbreviation = None;
        session.results[3].first_name = None;
        session.results[3].last_name = None;
        session.results[3].team_name = None;

        let results = assemble(&session);
        let sar = by_number(&results, "2");
        assert_eq!(sar.abbreviation, NOT_AVAILABLE);
        assert_eq!(sar.status, NOT_AVAILABLE);
        assert_eq!(sar.driver_name, NOT_AVAILABLE);
        assert_eq!(sar.team, NOT_AVAILABLE);
        assert_eq!(sar.total_time, None);
        assert_eq!(sar.position, None);
    }

    #[test]
    fn serialized_payload_has_no_nan_tokens() {
        let json = serde_json::to_string(&race_summary(&sample_race())).unwrap();
        assert!(!json.contains("NaN"));
        assert!(!json.contains("NaT"));
        assert!(json.contains(r#""circuit":"Bahrain Grand Prix""#));
        assert!(json.contains(r#""avg_laptime":null"#));
    }

    #[test]
    fn text_times_from_timing_libraries() {
        let mut session = sample_race();
        session.results[0].time = Some(RawDuration::Text("0 days 01:31:44.742000".into()));
        session.results[1].time = Some(RawDuration::Text("0 days 00:00:22.457000".into()));

        let results = assemble(&session);
        assert_eq!(results[0].total_time.as_deref(), Some("1:31:44.742"));
        assert_eq!(results[1].total_time.as_deref(), Some("+0:00:22.457"));
    }

    proptest! {
        #[test]
        fn prop_laps_completed_matches_lap_rows(extra in 0usize..20) {
            let mut session = sample_race();
            let template = session.laps[0].clone();
            for lap in 0..extra {
                let mut row = template.clone();
                row.lap_number = Some(4.0 + lap as f64);
                session.laps.push(row);
            }

            let results = assemble(&session);
            prop_assert_eq!(results.len(), session.results.len());
            for result in &results {
                let expected = session.laps.iter().filter(|l| l.driver_number == result.driver_number).count();
                prop_assert_eq!(result.laps as usize, expected);
            }
        }
    }
}
