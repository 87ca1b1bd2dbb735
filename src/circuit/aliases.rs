//! Event names whose circuit cannot be found from the name or venue text alone

/// Exact event name → `circuitRef`.
pub static ALIAS_OVERRIDES: &[(&str, &str)] = &[
    ("São Paulo Grand Prix", "interlagos"),
    ("Mexico City Grand Prix", "rodriguez"),
    ("Emilia Romagna Grand Prix", "imola"),
    ("Dutch Grand Prix", "zandvoort"),
    ("Azerbaijan Grand Prix", "baku"),
    ("Saudi Arabian Grand Prix", "jeddah"),
    ("Qatar Grand Prix", "losail"),
    ("Las Vegas Grand Prix", "vegas"),
    ("Monaco Grand Prix", "monaco"),
];

/// Look up an alias in the built-in map. Matching is exact.
pub fn alias_for(event_name: &str) -> Option<&'static str> {
    lookup(ALIAS_OVERRIDES, event_name)
}

pub(crate) fn lookup<'a>(aliases: &'a [(&'a str, &'a str)], event_name: &str) -> Option<&'a str> {
    aliases.iter().find(|(name, _)| *name == event_name).map(|(_, circuit_ref)| *circuit_ref)
}
