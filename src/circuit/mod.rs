//! # Circuit Reference Data
//!
//! Canonical venue records and the layered resolver that maps an event description
//! ("Bahrain Grand Prix", "Sakhir", "Bahrain") onto one of them.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   CircuitResolver                    │
//! │                                                      │
//! │  1. AliasMatcher            exact event name → ref   │
//! │              │ miss                                  │
//! │              ▼                                       │
//! │  2. LocationCountryMatcher  "location country" key   │
//! │              │ miss                                  │
//! │              ▼                                       │
//! │  3. NameContainmentMatcher  name ⊂ event or reverse  │
//! │              │ miss                                  │
//! │              ▼                                       │
//! │  4. LocationOnlyMatcher     location key             │
//! │              │ miss                                  │
//! │              ▼                                       │
//! │            None  (partial payload, not an error)     │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! The [`CircuitTable`] is loaded once and never mutated, so a single table is shared by
//! every request without locking.

use serde::Deserialize;

use crate::csv_utils::nullable;

pub mod aliases;
pub mod resolver;
pub mod table;

pub use aliases::{ALIAS_OVERRIDES, alias_for};
pub use resolver::{
    AliasMatcher, CircuitMatcher, CircuitResolver, EventQuery, LocationCountryMatcher,
    LocationOnlyMatcher, MatchStage, NameContainmentMatcher, Resolution,
};
pub use table::CircuitTable;

/// Lower-case, keep only alphanumerics and whitespace, trim.
///
/// Interior whitespace is kept as-is, so `"Mexico  City"` and `"Mexico City"` differ.
pub fn normalize_key(text: &str) -> String {
    text.chars()
        .filter(|ch| ch.is_alphanumeric() || ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Precomputed matching keys for one record.
#[derive(Debug, Clone, Default, PartialEq)]
struct MatchKeys {
    name: String,
    location_country: String,
    location: String,
}

/// A curated venue row from the circuit reference table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CircuitRecord {
    #[serde(rename = "circuitId")]
    pub circuit_id: u32,
    #[serde(rename = "circuitRef")]
    pub circuit_ref: String,
    pub name: String,
    pub location: String,
    pub country: String,
    #[serde(rename = "lat", default, deserialize_with = "nullable")]
    pub latitude: Option<f64>,
    #[serde(rename = "lng", default, deserialize_with = "nullable")]
    pub longitude: Option<f64>,
    #[serde(rename = "alt", default, deserialize_with = "nullable")]
    pub altitude: Option<f64>,
    #[serde(rename = "url", default)]
    pub wiki_url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub length_km: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub turns: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub layout_img_url: Option<String>,
    #[serde(skip)]
    keys: MatchKeys,
}

impl CircuitRecord {
    /// Build a record in code; matching keys are derived immediately.
    pub fn new(
        circuit_id: u32,
        circuit_ref: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            circuit_id,
            circuit_ref: circuit_ref.into(),
            name: name.into(),
            location: location.into(),
            country: country.into(),
            latitude: None,
            longitude: None,
            altitude: None,
            wiki_url: String::new(),
            length_km: None,
            turns: None,
            layout_img_url: None,
            keys: MatchKeys::default(),
        }
        .with_keys()
    }

    /// Derive the normalized matching keys from the text fields.
    pub(crate) fn with_keys(mut self) -> Self {
        self.keys = MatchKeys {
            name: normalize_key(&self.name),
            location_country: normalize_key(&format!("{} {}", self.location, self.country)),
            location: normalize_key(&self.location),
        };
        self
    }

    /// Normalized circuit name.
    pub fn normalized_name(&self) -> &str {
        &self.keys.name
    }

    /// Normalized `"location country"`.
    pub fn normalized_location_country(&self) -> &str {
        &self.keys.location_country
    }

    /// Normalized location alone.
    pub fn normalized_location(&self) -> &str {
        &self.keys.location
    }

    /// `"Monza, Italy"`.
    pub fn display_location(&self) -> String {
        format!("{}, {}", self.location, self.country)
    }
}
