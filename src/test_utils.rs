//! Test utilities: fixture paths and sample sessions
//!
//! Shared by unit tests, integration tests and benchmarks. The sample sessions are small
//! but cover the awkward cases: a gap-timed finisher, a lapped car without a time, a
//! retirement with a NaN position, untimed laps and a pit stop spanning two lap rows.

#![cfg(any(test, feature = "benchmark"))]

use std::path::{Path, PathBuf};

use crate::providers::MemoryProvider;
use crate::reference::{DriverRecord, PitStopEntry, QualifyingRecord, RaceRecord, RaceResultEntry, ReferenceData};
use crate::session::{EventInfo, LapRow, ResultRow, Session, SessionKind};
use crate::timing::RawDuration;

/// Error returned when a required fixture cannot be located.
#[derive(Debug, Clone)]
pub struct FixtureError {
    message: String,
}

impl std::fmt::Display for FixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FixtureError {}

/// Directory holding the YAML session fixtures and reference CSVs.
pub fn test_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data")
}

/// Require that a fixture exists under `test-data/`.
pub fn require_fixture(relative: &str) -> Result<PathBuf, FixtureError> {
    let path = test_data_dir().join(relative);
    if path.exists() {
        Ok(path)
    } else {
        Err(FixtureError { message: format!("Missing fixture: {}", path.display()) })
    }
}

pub fn bahrain_event() -> EventInfo {
    EventInfo {
        event_name: "Bahrain Grand Prix".into(),
        location: "Sakhir".into(),
        country: "Bahrain".into(),
        official_event_name: Some("FORMULA 1 GULF AIR BAHRAIN GRAND PRIX 2024".into()),
        round_number: Some(1),
        circuit: None,
    }
}

/// Classification row with identity fields filled in.
pub fn result_row(number: &str, abbreviation: &str, first: &str, last: &str, team: &str) -> ResultRow {
    ResultRow {
        driver_number: number.into(),
        abbreviation: Some(abbreviation.into()),
        first_name: Some(first.into()),
        last_name: Some(last.into()),
        team_name: Some(team.into()),
        ..Default::default()
    }
}

/// Lap row with a time in seconds (`None` for an untimed lap).
pub fn lap_row(number: &str, abbreviation: &str, team: &str, lap: u32, time: Option<f64>, compound: &str) -> LapRow {
    LapRow {
        driver_number: number.into(),
        driver: Some(abbreviation.into()),
        team: Some(team.into()),
        lap_number: Some(f64::from(lap)),
        lap_time: time.map(RawDuration::from),
        compound: Some(compound.into()),
        ..Default::default()
    }
}

/// Four-car race over three laps.
///
/// - VER wins in 5504.742s and pits on lap 2 (pit-out stamped on lap 3, 22.5s later)
/// - PER finishes 22.457s behind
/// - LEC is classified `+1 Lap` without a time
/// - SAR retires after one untimed lap
pub fn sample_race() -> Session {
    let mut ver = result_row("1", "VER", "Max", "Verstappen", "Red Bull Racing");
    ver.position = Some(1.0);
    ver.grid_position = Some(1.0);
    ver.status = Some("Finished".into());
    ver.time = Some(RawDuration::from(5504.742));

    let mut per = result_row("11", "PER", "Sergio", "Perez", "Red Bull Racing");
    per.position = Some(2.0);
    per.grid_position = Some(5.0);
    per.status = Some("Finished".into());
    per.time = Some(RawDuration::from(22.457));

    let mut lec = result_row("16", "LEC", "Charles", "Leclerc", "Ferrari");
    lec.position = Some(3.0);
    lec.grid_position = Some(2.0);
    lec.status = Some("+1 Lap".into());

    let mut sar = result_row("2", "SAR", "Logan", "Sargeant", "Williams");
    sar.position = Some(f64::NAN);
    sar.grid_position = Some(20.0);
    sar.status = Some("Retired".into());

    let mut laps = vec![
        lap_row("1", "VER", "Red Bull Racing", 1, Some(97.284), "SOFT"),
        lap_row("1", "VER", "Red Bull Racing", 2, Some(95.912), "SOFT"),
        lap_row("1", "VER", "Red Bull Racing", 3, Some(98.5), "HARD"),
        lap_row("11", "PER", "Red Bull Racing", 1, Some(98.0), "SOFT"),
        lap_row("11", "PER", "Red Bull Racing", 2, Some(97.5), "SOFT"),
        lap_row("11", "PER", "Red Bull Racing", 3, Some(97.0), "SOFT"),
        lap_row("16", "LEC", "Ferrari", 1, Some(97.8), "SOFT"),
        lap_row("16", "LEC", "Ferrari", 2, None, "SOFT"),
        lap_row("16", "LEC", "Ferrari", 3, Some(97.9), "SOFT"),
        lap_row("2", "SAR", "Williams", 1, None, "MEDIUM"),
    ];
    laps[1].pit_in_time = Some(RawDuration::from(3600.0));
    laps[2].pit_out_time = Some(RawDuration::from(3622.5));

    let running = [(0, 1.0), (1, 1.0), (2, 1.0), (3, 3.0), (4, 2.0), (5, 2.0), (6, 2.0), (7, 3.0), (8, 3.0), (9, 4.0)];
    for (index, position) in running {
        laps[index].position = Some(position);
    }

    Session { event: bahrain_event(), results: vec![ver, per, lec, sar], laps }
}

/// Qualifying for the same event: LEC sets the fastest lap, SAR only runs Q1.
pub fn sample_qualifying() -> Session {
    let mut ver = result_row("1", "VER", "Max", "Verstappen", "Red Bull Racing");
    ver.position = Some(1.0);
    ver.q1 = Some(RawDuration::from(90.031));
    ver.q2 = Some(RawDuration::from(89.374));
    ver.q3 = Some(RawDuration::from(89.179));

    let mut lec = result_row("16", "LEC", "Charles", "Leclerc", "Ferrari");
    lec.position = Some(2.0);
    lec.q1 = Some(RawDuration::from(90.243));
    lec.q2 = Some(RawDuration::from(89.165));
    lec.q3 = Some(RawDuration::from(89.407));

    let mut sar = result_row("2", "SAR", "Logan", "Sargeant", "Williams");
    sar.position = Some(20.0);
    sar.q1 = Some(RawDuration::Text("0 days 00:01:31.500000".into()));
    sar.q2 = Some(RawDuration::Text("NaT".into()));

    let laps = vec![
        lap_row("1", "VER", "Red Bull Racing", 12, Some(89.179), "SOFT"),
        lap_row("16", "LEC", "Ferrari", 9, Some(89.165), "SOFT"),
        lap_row("2", "SAR", "Williams", 4, Some(91.5), "SOFT"),
    ];

    Session { event: bahrain_event(), results: vec![ver, lec, sar], laps }
}

/// Provider holding the sample race and qualifying as round 1 of 2024.
pub fn sample_provider() -> MemoryProvider {
    MemoryProvider::new()
        .with_session(2024, SessionKind::Race, sample_race())
        .with_session(2024, SessionKind::Qualifying, sample_qualifying())
        .with_event(2024, 2, "Saudi Arabian Grand Prix")
}

/// Reference tables matching the sample sessions.
///
/// VER's lap-2 stop is recorded as 23.321s, overriding the 22.5s timestamp delta.
pub fn sample_reference() -> ReferenceData {
    let driver = |id: u32, reference: &str, code: &str, forename: &str, surname: &str, dob: &str, nationality: &str| {
        DriverRecord {
            driver_id: id,
            driver_ref: reference.into(),
            number: None,
            code: Some(code.into()),
            forename: forename.into(),
            surname: surname.into(),
            dob: Some(dob.into()),
            nationality: Some(nationality.into()),
            url: String::new(),
        }
    };

    ReferenceData::from_tables(
        vec![
            RaceRecord { race_id: 1100, year: 2023, round: 1, circuit_id: 3, name: "Bahrain Grand Prix".into(), date: None },
            RaceRecord { race_id: 1121, year: 2024, round: 1, circuit_id: 3, name: "Bahrain Grand Prix".into(), date: None },
        ],
        vec![
            driver(830, "max_verstappen", "VER", "Max", "Verstappen", "1997-09-30", "Dutch"),
            driver(815, "perez", "PER", "Sergio", "Pérez", "1990-01-26", "Mexican"),
            driver(844, "leclerc", "LEC", "Charles", "Leclerc", "1997-10-16", "Monegasque"),
        ],
        vec![PitStopEntry {
            race_id: 1121,
            driver_id: 830,
            stop: 1,
            lap: 2,
            time: Some("15:42:10".into()),
            duration: Some("23.321".into()),
            milliseconds: Some(23321),
        }],
        vec![
            RaceResultEntry { race_id: 1100, driver_id: 830, position: Some(1), rank: Some(1) },
            RaceResultEntry { race_id: 1100, driver_id: 844, position: Some(3), rank: Some(2) },
            RaceResultEntry { race_id: 1121, driver_id: 830, position: Some(1), rank: Some(3) },
            RaceResultEntry { race_id: 1121, driver_id: 844, position: Some(4), rank: Some(1) },
        ],
        vec![
            QualifyingRecord { race_id: 1100, driver_id: 830, position: Some(1) },
            QualifyingRecord { race_id: 1121, driver_id: 830, position: Some(1) },
            QualifyingRecord { race_id: 1121, driver_id: 844, position: Some(2) },
        ],
    )
}
