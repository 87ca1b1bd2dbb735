//! In-memory provider for embedding applications and tests

use std::collections::{BTreeMap, HashMap};

use super::{ScheduleEntry, resolve_event};
use crate::provider::SessionProvider;
use crate::session::{Session, SessionKind};
use crate::{PaddockError, Result};

/// Provider over sessions registered up front.
///
/// The schedule for a year is derived from the registered sessions' event metadata.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    schedules: BTreeMap<i32, Vec<ScheduleEntry>>,
    sessions: HashMap<(i32, u32, SessionKind), Session>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session. Events without a round number are appended to the season.
    pub fn with_session(mut self, year: i32, kind: SessionKind, mut session: Session) -> Self {
        let schedule = self.schedules.entry(year).or_default();

        let existing = schedule.iter().find(|entry| entry.event_name == session.event.event_name);
        let round = match (existing, session.event.round_number) {
            (Some(entry), _) => entry.round_number,
            (None, Some(round)) => round,
            (None, None) => schedule.iter().map(|entry| entry.round_number).max().unwrap_or(0) + 1,
        };

        if existing.is_none() {
            schedule.push(ScheduleEntry::new(round, session.event.event_name.clone()));
            schedule.sort_by_key(|entry| entry.round_number);
        }

        session.event.round_number = Some(round);
        self.sessions.insert((year, round, kind), session);
        self
    }

    /// Register an event without any session data.
    pub fn with_event(mut self, year: i32, round: u32, event_name: impl Into<String>) -> Self {
        let schedule = self.schedules.entry(year).or_default();
        schedule.push(ScheduleEntry::new(round, event_name));
        schedule.sort_by_key(|entry| entry.round_number);
        self
    }
}

#[async_trait::async_trait]
impl SessionProvider for MemoryProvider {
    async fn load_session(&self, year: i32, event: &str, kind: SessionKind) -> Result<Session> {
        let not_found = || PaddockError::session_not_found(year, event, kind.code());

        let schedule = self.schedules.get(&year).ok_or_else(not_found)?;
        let entry = resolve_event(schedule, event).ok_or_else(not_found)?;

        self.sessions.get(&(year, entry.round_number, kind)).cloned().ok_or_else(not_found)
    }

    async fn event_schedule(&self, year: i32) -> Result<Vec<String>> {
        self.schedules
            .get(&year)
            .map(|schedule| schedule.iter().map(|entry| entry.event_name.clone()).collect())
            .ok_or_else(|| PaddockError::provider_failed(format!("No event schedule available for {year}")))
    }
}
