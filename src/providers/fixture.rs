//! Fixture provider reading exported sessions from a directory tree
//!
//! ```text
//! {root}/
//!   2024/
//!     schedule.yaml                 - RoundNumber / EventName / Slug entries
//!     bahrain_grand_prix/
//!       R.yaml                      - one file per session code
//!       Q.yaml
//! ```

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{ScheduleEntry, resolve_event};
use crate::provider::SessionProvider;
use crate::session::{Session, SessionKind};
use crate::yaml_utils::sanitize_yaml;
use crate::{PaddockError, Result};

/// Provider backed by YAML session exports on disk.
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    root: PathBuf,
}

impl FixtureProvider {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parsed `schedule.yaml` for a season.
    pub async fn schedule(&self, year: i32) -> Result<Vec<ScheduleEntry>> {
        let path = self.root.join(year.to_string()).join("schedule.yaml");
        if !path.exists() {
            return Err(PaddockError::provider_failed(format!("No event schedule available for {year}")));
        }

        let yaml = read_text(&path).await?;
        let cleaned = sanitize_yaml(&yaml)?;
        let mut entries: Vec<ScheduleEntry> = serde_yaml_ng::from_str(&cleaned)
            .map_err(|e| PaddockError::parse(format!("schedule {}", path.display()), e))?;
        entries.sort_by_key(|entry| entry.round_number);

        debug!(year, events = entries.len(), path = %path.display(), "Read event schedule");
        Ok(entries)
    }

    fn session_path(&self, year: i32, entry: &ScheduleEntry, kind: SessionKind) -> PathBuf {
        self.root.join(year.to_string()).join(entry.slug()).join(format!("{}.yaml", kind.code()))
    }
}

#[async_trait::async_trait]
impl SessionProvider for FixtureProvider {
    async fn load_session(&self, year: i32, event: &str, kind: SessionKind) -> Result<Session> {
        let schedule = match self.schedule(year).await {
            Ok(schedule) => schedule,
            Err(PaddockError::Provider { .. }) => {
                return Err(PaddockError::session_not_found(year, event, kind.code()));
            }
            Err(e) => return Err(e),
        };

        let entry = resolve_event(&schedule, event)
            .ok_or_else(|| PaddockError::session_not_found(year, event, kind.code()))?;

        let path = self.session_path(year, entry, kind);
        if !path.exists() {
            debug!(path = %path.display(), "Session fixture missing");
            return Err(PaddockError::session_not_found(year, &entry.event_name, kind.code()));
        }

        let mut session = Session::parse(&read_text(&path).await?)?;
        if session.event.event_name.is_empty() {
            session.event.event_name = entry.event_name.clone();
        }
        session.event.round_number.get_or_insert(entry.round_number);

        info!(
            year,
            event = %session.event.event_name,
            session = %kind,
            results = session.results.len(),
            laps = session.laps.len(),
            "Loaded session fixture"
        );
        Ok(session)
    }

    async fn event_schedule(&self, year: i32) -> Result<Vec<String>> {
        Ok(self.schedule(year).await?.into_iter().map(|entry| entry.event_name).collect())
    }
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| PaddockError::file_error(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fixture(root: &Path) {
        let season = root.join("2024");
        fs::create_dir_all(season.join("bahrain_grand_prix")).unwrap();
        fs::create_dir_all(season.join("imola")).unwrap();
        fs::write(
            season.join("schedule.yaml"),
            "- RoundNumber: 7\n  EventName: Emilia Romagna Grand Prix\n  Slug: imola\n\
             - RoundNumber: 1\n  EventName: Bahrain Grand Prix\n",
        )
        .unwrap();
        fs::write(
            season.join("bahrain_grand_prix").join("R.yaml"),
            "Event:\n  Location: Sakhir\n  Country: Bahrain\nResults:\n  - DriverNumber: 1\n    Abbreviation: VER\n",
        )
        .unwrap();
        fs::write(
            season.join("imola").join("Q.yaml"),
            "Event:\n  EventName: Emilia Romagna Grand Prix\n  RoundNumber: 7\nResults: []\n",
        )
        .unwrap();
    }

    #[tokio::test]
    async fn schedule_is_in_round_order() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        let provider = FixtureProvider::new(dir.path());

        let names = provider.event_schedule(2024).await.unwrap();
        assert_eq!(names, vec!["Bahrain Grand Prix", "Emilia Romagna Grand Prix"]);
    }

    #[tokio::test]
    async fn loads_session_and_fills_event_identity() {
        let _ = tracing_subscriber::fmt::try_init();
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        let provider = FixtureProvider::new(dir.path());

        let session = provider.load_session(2024, "bahrain", SessionKind::Race).await.unwrap();
        assert_eq!(session.event.event_name, "Bahrain Grand Prix");
        assert_eq!(session.event.round_number, Some(1));
        assert_eq!(session.drivers(), vec!["1"]);

        let quali = provider.load_session(2024, "7", SessionKind::Qualifying).await.unwrap();
        assert_eq!(quali.event.event_name, "Emilia Romagna Grand Prix");
    }

    #[tokio::test]
    async fn missing_data_is_session_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        let provider = FixtureProvider::new(dir.path());

        let no_session = provider.load_session(2024, "Bahrain Grand Prix", SessionKind::Sprint).await;
        assert!(matches!(no_session, Err(PaddockError::SessionNotFound { .. })));

        let no_event = provider.load_session(2024, "Atlantis", SessionKind::Race).await;
        assert!(matches!(no_event, Err(PaddockError::SessionNotFound { .. })));

        let no_season = provider.load_session(1950, "Monaco", SessionKind::Race).await;
        assert!(matches!(no_season, Err(PaddockError::SessionNotFound { year: 1950, .. })));

        assert!(matches!(provider.event_schedule(1950).await, Err(PaddockError::Provider { .. })));
    }
}
