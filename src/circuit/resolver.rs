//! Layered circuit matching
//!
//! Each heuristic is an independent [`CircuitMatcher`]. The resolver asks them in order and
//! stops at the first hit. A full miss is a normal outcome: the caller still renders the
//! event, just without circuit metadata.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::aliases::{ALIAS_OVERRIDES, lookup};
use super::{CircuitRecord, CircuitTable, normalize_key};

/// Which heuristic produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStage {
    Alias,
    LocationCountry,
    NameContainment,
    LocationOnly,
}

impl fmt::Display for MatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchStage::Alias => "alias",
            MatchStage::LocationCountry => "location+country",
            MatchStage::NameContainment => "name containment",
            MatchStage::LocationOnly => "location only",
        };
        f.write_str(name)
    }
}

/// Free-text description of an event as the session provider reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventQuery<'a> {
    pub event_name: &'a str,
    pub location: &'a str,
    pub country: &'a str,
}

impl<'a> EventQuery<'a> {
    pub fn new(event_name: &'a str, location: &'a str, country: &'a str) -> Self {
        Self { event_name, location, country }
    }
}

/// One matching heuristic over a circuit table.
pub trait CircuitMatcher: Send + Sync {
    /// Stage reported when this matcher hits.
    fn stage(&self) -> MatchStage;

    /// First record this heuristic accepts, in table order.
    fn find<'t>(&self, table: &'t CircuitTable, query: &EventQuery<'_>) -> Option<&'t CircuitRecord>;
}

/// Fixed event-name → ref overrides.
#[derive(Debug, Clone, Copy)]
pub struct AliasMatcher {
    aliases: &'static [(&'static str, &'static str)],
}

impl AliasMatcher {
    pub fn new(aliases: &'static [(&'static str, &'static str)]) -> Self {
        Self { aliases }
    }
}

impl Default for AliasMatcher {
    fn default() -> Self {
        Self::new(ALIAS_OVERRIDES)
    }
}

impl CircuitMatcher for AliasMatcher {
    fn stage(&self) -> MatchStage {
        MatchStage::Alias
    }

    fn find<'t>(&self, table: &'t CircuitTable, query: &EventQuery<'_>) -> Option<&'t CircuitRecord> {
        let circuit_ref = lookup(self.aliases, query.event_name)?;
        let record = table.by_ref(circuit_ref);
        if record.is_none() {
            warn!(event = query.event_name, circuit_ref, "Alias points at a circuit missing from the table");
        }
        record
    }
}

/// Exact match on the normalized `"location country"` key.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationCountryMatcher;

impl CircuitMatcher for LocationCountryMatcher {
    fn stage(&self) -> MatchStage {
        MatchStage::LocationCountry
    }

    fn find<'t>(&self, table: &'t CircuitTable, query: &EventQuery<'_>) -> Option<&'t CircuitRecord> {
        let key = normalize_key(&format!("{} {}", query.location, query.country));
        if key.is_empty() {
            return None;
        }
        table.iter().find(|record| record.normalized_location_country() == key)
    }
}

/// Circuit name contained in the event name, or the other way round.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameContainmentMatcher;

impl CircuitMatcher for NameContainmentMatcher {
    fn stage(&self) -> MatchStage {
        MatchStage::NameContainment
    }

    fn find<'t>(&self, table: &'t CircuitTable, query: &EventQuery<'_>) -> Option<&'t CircuitRecord> {
        let event = normalize_key(query.event_name);
        if event.is_empty() {
            return None;
        }
        table.iter().find(|record| {
            let name = record.normalized_name();
            !name.is_empty() && (event.contains(name) || name.contains(event.as_str()))
        })
    }
}

/// Normalized location alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationOnlyMatcher;

impl CircuitMatcher for LocationOnlyMatcher {
    fn stage(&self) -> MatchStage {
        MatchStage::LocationOnly
    }

    fn find<'t>(&self, table: &'t CircuitTable, query: &EventQuery<'_>) -> Option<&'t CircuitRecord> {
        let location = normalize_key(query.location);
        if location.is_empty() {
            return None;
        }
        table.iter().find(|record| record.normalized_location() == location)
    }
}

/// A successful match and the stage that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'t> {
    pub record: &'t CircuitRecord,
    pub stage: MatchStage,
}

/// Ordered matcher chain over a shared circuit table.
pub struct CircuitResolver {
    table: Arc<CircuitTable>,
    matchers: Vec<Box<dyn CircuitMatcher>>,
}

impl CircuitResolver {
    /// Resolver with the standard four stages.
    pub fn new(table: Arc<CircuitTable>) -> Self {
        Self::with_matchers(
            table,
            vec![
                Box::new(AliasMatcher::default()),
                Box::new(LocationCountryMatcher),
                Box::new(NameContainmentMatcher),
                Box::new(LocationOnlyMatcher),
            ],
        )
    }

    /// Resolver over the bundled table.
    pub fn bundled() -> Self {
        Self::new(CircuitTable::bundled())
    }

    pub fn with_matchers(table: Arc<CircuitTable>, matchers: Vec<Box<dyn CircuitMatcher>>) -> Self {
        Self { table, matchers }
    }

    pub fn table(&self) -> &CircuitTable {
        &self.table
    }

    /// Match an event to a circuit record.
    pub fn resolve(&self, event_name: &str, location: &str, country: &str) -> Option<&CircuitRecord> {
        self.resolve_with_stage(&EventQuery::new(event_name, location, country))
            .map(|resolution| resolution.record)
    }

    /// Match an event and report which stage hit.
    pub fn resolve_with_stage(&self, query: &EventQuery<'_>) -> Option<Resolution<'_>> {
        for matcher in &self.matchers {
            if let Some(record) = matcher.find(&self.table, query) {
                debug!(
                    event = query.event_name,
                    circuit_ref = %record.circuit_ref,
                    stage = %matcher.stage(),
                    "Resolved circuit"
                );
                return Some(Resolution { record, stage: matcher.stage() });
            }
        }

        warn!(
            event = query.event_name,
            location = query.location,
            country = query.country,
            "No circuit matched event"
        );
        None
    }
}

impl fmt::Debug for CircuitResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stages: Vec<MatchStage> = self.matchers.iter().map(|m| m.stage()).collect();
        f.debug_struct("CircuitResolver")
            .field("circuits", &self.table.len())
            .field("stages", &stages)
            .finish()
    }
}

impl Default for CircuitResolver {
    fn default() -> Self {
        Self::bundled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table() -> Arc<CircuitTable> {
        Arc::new(CircuitTable::from_records([
            CircuitRecord::new(3, "bahrain", "Bahrain International Circuit", "Sakhir", "Bahrain"),
            CircuitRecord::new(6, "monaco", "Circuit de Monaco", "Monte-Carlo", "Monaco"),
            CircuitRecord::new(9, "silverstone", "Silverstone Circuit", "Silverstone", "UK"),
            CircuitRecord::new(14, "monza", "Autodromo Nazionale di Monza", "Monza", "Italy"),
            CircuitRecord::new(18, "interlagos", "Autódromo José Carlos Pace", "São Paulo", "Brazil"),
            CircuitRecord::new(69, "americas", "Circuit of the Americas", "Austin", "USA"),
            CircuitRecord::new(80, "vegas", "Las Vegas Strip Street Circuit", "Las Vegas", "United States"),
        ]))
    }

    fn stage_of(resolver: &CircuitResolver, name: &str, location: &str, country: &str) -> Option<(String, MatchStage)> {
        resolver
            .resolve_with_stage(&EventQuery::new(name, location, country))
            .map(|r| (r.record.circuit_ref.clone(), r.stage))
    }

    #[test]
    fn alias_wins_before_other_stages() {
        let _ = tracing_subscriber::fmt::try_init();
        let resolver = CircuitResolver::new(table());

        assert_eq!(
            stage_of(&resolver, "São Paulo Grand Prix", "São Paulo", "Brazil"),
            Some(("interlagos".to_string(), MatchStage::Alias))
        );
        assert_eq!(
            stage_of(&resolver, "Monaco Grand Prix", "Nowhere", "Nowhere"),
            Some(("monaco".to_string(), MatchStage::Alias))
        );
    }

    #[test]
    fn location_and_country_match() {
        let resolver = CircuitResolver::new(table());
        assert_eq!(
            stage_of(&resolver, "Bahrain Grand Prix", "Sakhir", "Bahrain"),
            Some(("bahrain".to_string(), MatchStage::LocationCountry))
        );
    }

    #[test]
    fn name_containment_either_direction() {
        let resolver = CircuitResolver::new(table());

        assert_eq!(
            stage_of(&resolver, "Silverstone Circuit 70th Anniversary", "", ""),
            Some(("silverstone".to_string(), MatchStage::NameContainment))
        );
        assert_eq!(
            stage_of(&resolver, "Americas", "Elsewhere", "Nowhere"),
            Some(("americas".to_string(), MatchStage::NameContainment))
        );
    }

    #[test]
    fn location_only_fallback() {
        let resolver = CircuitResolver::new(table());
        assert_eq!(
            stage_of(&resolver, "Italian Grand Prix", "Monza", "Republic of Italy"),
            Some(("monza".to_string(), MatchStage::LocationOnly))
        );
    }

    #[test]
    fn unmatched_event_is_none() {
        let resolver = CircuitResolver::new(table());
        assert!(resolver.resolve("Atlantis Grand Prix", "Atlantis", "Ocean").is_none());
        assert!(resolver.resolve("", "", "").is_none());
    }

    #[test]
    fn empty_event_name_skips_containment() {
        let table = table();
        let query = EventQuery::new("???", "Monza", "Elsewhere");
        assert!(NameContainmentMatcher.find(&table, &query).is_none());

        let resolver = CircuitResolver::new(table);
        assert_eq!(stage_of(&resolver, "???", "Monza", "Elsewhere"), Some(("monza".to_string(), MatchStage::LocationOnly)));
    }

    #[test]
    fn alias_to_missing_ref_falls_through() {
        static BROKEN: &[(&str, &str)] = &[("Bahrain Grand Prix", "no_such_circuit")];
        let resolver = CircuitResolver::with_matchers(
            table(),
            vec![Box::new(AliasMatcher::new(BROKEN)), Box::new(LocationCountryMatcher)],
        );

        assert_eq!(
            stage_of(&resolver, "Bahrain Grand Prix", "Sakhir", "Bahrain"),
            Some(("bahrain".to_string(), MatchStage::LocationCountry))
        );
    }

    #[test]
    fn punctuation_is_ignored_by_keys() {
        let resolver = CircuitResolver::new(table());
        assert_eq!(
            stage_of(&resolver, "Grand Prix de Monaco", "Monte-Carlo", "Monaco"),
            Some(("monaco".to_string(), MatchStage::LocationCountry))
        );
        // Hyphen removal joins the words; a spaced spelling is a different key
        assert!(resolver.resolve("Grand Prix de Monaco", "Monte Carlo", "Monaco").is_none());
    }

    #[test]
    fn bundled_resolver_covers_calendar() {
        let resolver = CircuitResolver::bundled();
        let cases = [
            ("Bahrain Grand Prix", "Sakhir", "Bahrain", "bahrain"),
            ("Saudi Arabian Grand Prix", "Jeddah", "Saudi Arabia", "jeddah"),
            ("Australian Grand Prix", "Melbourne", "Australia", "albert_park"),
            ("Japanese Grand Prix", "Suzuka", "Japan", "suzuka"),
            ("Miami Grand Prix", "Miami", "United States", "miami"),
            ("British Grand Prix", "Silverstone", "Great Britain", "silverstone"),
            ("United States Grand Prix", "Austin", "United States", "americas"),
            ("Mexico City Grand Prix", "Mexico City", "Mexico", "rodriguez"),
            ("Las Vegas Grand Prix", "Las Vegas", "United States", "vegas"),
            ("Abu Dhabi Grand Prix", "Abu Dhabi", "UAE", "yas_marina"),
        ];

        for (name, location, country, expected) in cases {
            let record = resolver.resolve(name, location, country);
            assert_eq!(record.map(|r| r.circuit_ref.as_str()), Some(expected), "{name}");
        }
    }

    proptest! {
        #[test]
        fn prop_resolution_is_deterministic(name in "[A-Za-z ]{0,30}", location in "[A-Za-z ]{0,15}") {
            let resolver = CircuitResolver::new(table());
            let first = resolver.resolve(&name, &location, "Italy").map(|r| r.circuit_id);
            let second = resolver.resolve(&name, &location, "Italy").map(|r| r.circuit_id);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_every_record_resolves_by_its_own_venue(index in 0usize..7) {
            let table = table();
            let record = table.records()[index].clone();
            let resolver = CircuitResolver::new(table);
            let found = resolver.resolve("Unrelated Event", &record.location, &record.country);
            prop_assert_eq!(found.map(|r| r.circuit_id), Some(record.circuit_id));
        }
    }
}
