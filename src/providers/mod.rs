//! Session provider implementations
//!
//! Both providers share the schedule model and the event-identifier rules timing libraries
//! apply when a caller asks for `"Monaco"` or `"6"` instead of the full event name.

use serde::{Deserialize, Serialize};

use crate::circuit::normalize_key;

pub mod fixture;
pub mod memory;

pub use fixture::FixtureProvider;
pub use memory::MemoryProvider;

/// One event of a season schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleEntry {
    pub round_number: u32,
    pub event_name: String,
    /// Directory name for the event's session files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl ScheduleEntry {
    pub fn new(round_number: u32, event_name: impl Into<String>) -> Self {
        Self { round_number, event_name: event_name.into(), slug: None }
    }

    /// Explicit slug, or the event name normalized with `_` between words.
    pub fn slug(&self) -> String {
        match &self.slug {
            Some(slug) => slug.clone(),
            None => normalize_key(&self.event_name).split_whitespace().collect::<Vec<_>>().join("_"),
        }
    }
}

/// Resolve an event identifier against a schedule.
///
/// Tried in order: round number, exact event name, then normalized containment in
/// either direction. Containment must be unambiguous to count.
pub fn resolve_event<'a>(schedule: &'a [ScheduleEntry], identifier: &str) -> Option<&'a ScheduleEntry> {
    let identifier = identifier.trim();

    if let Ok(round) = identifier.parse::<u32>() {
        return schedule.iter().find(|entry| entry.round_number == round);
    }

    if let Some(entry) = schedule.iter().find(|entry| entry.event_name == identifier) {
        return Some(entry);
    }

    let wanted = normalize_key(identifier);
    if wanted.is_empty() {
        return None;
    }

    let mut matches = schedule.iter().filter(|entry| {
        let name = normalize_key(&entry.event_name);
        name.contains(&wanted) || wanted.contains(&name)
    });
    let first = matches.next()?;
    match matches.next() {
        Some(_) => None,
        None => Some(first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> Vec<ScheduleEntry> {
        vec![
            ScheduleEntry::new(1, "Bahrain Grand Prix"),
            ScheduleEntry::new(6, "Miami Grand Prix"),
            ScheduleEntry::new(7, "Emilia Romagna Grand Prix"),
            ScheduleEntry::new(8, "Monaco Grand Prix"),
            ScheduleEntry::new(21, "São Paulo Grand Prix"),
        ]
    }

    #[test]
    fn resolves_round_numbers() {
        let schedule = schedule();
        assert_eq!(resolve_event(&schedule, "8").map(|e| e.event_name.as_str()), Some("Monaco Grand Prix"));
        assert!(resolve_event(&schedule, "2").is_none());
    }

    #[test]
    fn resolves_names_and_fragments() {
        let schedule = schedule();
        assert_eq!(resolve_event(&schedule, "Miami Grand Prix").map(|e| e.round_number), Some(6));
        assert_eq!(resolve_event(&schedule, "monaco").map(|e| e.round_number), Some(8));
        assert_eq!(resolve_event(&schedule, "São Paulo").map(|e| e.round_number), Some(21));
        assert!(resolve_event(&schedule, "Atlantis").is_none());
        assert!(resolve_event(&schedule, "   ").is_none());
    }

    #[test]
    fn ambiguous_fragments_do_not_resolve() {
        let schedule = schedule();
        assert!(resolve_event(&schedule, "Grand Prix").is_none());
    }

    #[test]
    fn slugs() {
        assert_eq!(ScheduleEntry::new(7, "Emilia Romagna Grand Prix").slug(), "emilia_romagna_grand_prix");
        let explicit = ScheduleEntry { slug: Some("imola".into()), ..ScheduleEntry::new(7, "Emilia Romagna Grand Prix") };
        assert_eq!(explicit.slug(), "imola");
    }
}
