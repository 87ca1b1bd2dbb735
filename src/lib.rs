//! Type-safe reshaping of motorsport session data for web frontends.
//!
//! We Race Paddock turns what a timing library exposes about a session (classification,
//! laps, pit timestamps, event metadata) into JSON-ready payloads, and matches events to a
//! curated circuit reference table.
//!
//! # Features
//!
//! - **Circuit Matching**: alias, venue and name heuristics over a bundled circuit table
//! - **Duration Normalization**: one display convention for totals, gaps and lap times
//! - **Payload Assembly**: race, qualifying, pit stop, position and circuit payloads
//! - **Reference Data**: historical pit-stop overrides and driver career profiles
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use paddock::{Paddock, providers::FixtureProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let paddock = Paddock::new(FixtureProvider::new("./fixtures"));
//!
//!     let summary = paddock.race_summary(2024, "Bahrain").await?;
//!     for entrant in &summary.results {
//!         println!("{:>3} {} {:?}", entrant.driver_number, entrant.driver_name, entrant.total_time);
//!     }
//!
//!     // At a request boundary, errors become {"error": "..."}
//!     let response = Paddock::respond(paddock.circuit_details(2024, "Monaco").await);
//!     println!("{}", serde_json::to_string(&response)?);
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod csv_utils;
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod timing;
mod yaml_utils;

// Data model and sources
pub mod config;
pub mod provider;
pub mod providers;
pub mod session;

// Reference data
pub mod circuit;
pub mod reference;

// Payloads
pub mod assemble;

// Core exports
pub use error::*;
pub use timing::{DurationMode, RawDuration, normalize};

pub use assemble::{
    CircuitPayload, DriverProfile, EntrantResult, PitStopRecord, PitStopsPayload, PositionMatrix,
    QualifyingSummary, RaceList, RaceSummary,
};
pub use circuit::{CircuitRecord, CircuitResolver, CircuitTable};
pub use config::PaddockConfig;
pub use provider::SessionProvider;
pub use reference::ReferenceData;
pub use session::{Session, SessionKind};
pub use yaml_utils::sanitize_yaml;

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};

/// Payload or structured error, as returned across the request boundary.
///
/// Serializes untagged: the payload's own fields, or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Ok(T),
    Error { error: String },
}

impl<T> ApiResponse<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, ApiResponse::Error { .. })
    }
}

/// Entry point tying a session provider to the circuit and reference tables.
///
/// Every method is one independent request against the provider. Nothing is cached
/// between calls apart from the immutable circuit and reference tables.
///
/// # Examples
///
/// ```rust,no_run
/// use paddock::{Paddock, PaddockConfig};
///
/// # #[tokio::main]
/// # async fn main() -> paddock::Result<()> {
/// let config = PaddockConfig::from_env()?;
/// let paddock = Paddock::from_config(&config)?;
/// let races = paddock.race_list(2024).await?;
/// # Ok(())
/// # }
/// ```
pub struct Paddock {
    provider: Arc<dyn SessionProvider>,
    resolver: CircuitResolver,
    reference: Option<Arc<ReferenceData>>,
}

impl Paddock {
    /// Paddock over a provider, with the bundled circuit table and no reference data.
    pub fn new(provider: impl SessionProvider + 'static) -> Self {
        Self::with_provider(Arc::new(provider))
    }

    pub fn with_provider(provider: Arc<dyn SessionProvider>) -> Self {
        Self { provider, resolver: CircuitResolver::bundled(), reference: None }
    }

    /// Fixture provider, circuit table and reference data as configured.
    pub fn from_config(config: &PaddockConfig) -> Result<Self> {
        config.validate()?;
        let paddock = Self::new(providers::FixtureProvider::new(&config.fixtures_dir))
            .with_resolver(CircuitResolver::new(config.circuit_table()?));
        Ok(match config.reference_data()? {
            Some(reference) => paddock.with_reference(reference),
            None => paddock,
        })
    }

    pub fn with_resolver(mut self, resolver: CircuitResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_reference(mut self, reference: Arc<ReferenceData>) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn resolver(&self) -> &CircuitResolver {
        &self.resolver
    }

    /// Race results for an event.
    pub async fn race_summary(&self, year: i32, gp_name: &str) -> Result<RaceSummary> {
        let session = self.provider.load_session(year, gp_name, SessionKind::Race).await?;
        Ok(assemble::race::race_summary(&session))
    }

    /// Qualifying classification with Q1/Q2/Q3 times.
    pub async fn qualifying_summary(&self, year: i32, gp_name: &str) -> Result<QualifyingSummary> {
        let session = self.provider.load_session(year, gp_name, SessionKind::Qualifying).await?;
        Ok(assemble::qualifying::qualifying_summary(&session))
    }

    /// Race pit stops, with reference durations where recorded.
    pub async fn pit_stops(&self, year: i32, gp_name: &str) -> Result<PitStopsPayload> {
        let session = self.provider.load_session(year, gp_name, SessionKind::Race).await?;
        Ok(assemble::pit_stops::pit_stops_payload(&session, year, self.reference.as_deref()))
    }

    /// Lap-by-lap running order of the race.
    pub async fn race_positions(&self, year: i32, gp_name: &str) -> Result<PositionMatrix> {
        let session = self.provider.load_session(year, gp_name, SessionKind::Race).await?;
        Ok(assemble::positions::position_matrix(&session))
    }

    /// Event context, matched circuit record and fastest laps.
    ///
    /// An unmatched circuit is not an error; `csv_match_found` is `false` and `circuit`
    /// is `null`.
    pub async fn circuit_details(&self, year: i32, gp_name: &str) -> Result<CircuitPayload> {
        let race = self.provider.load_session(year, gp_name, SessionKind::Race).await?;
        let qualifying = match self.provider.load_session(year, gp_name, SessionKind::Qualifying).await {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(year, event = gp_name, error = %e, "Qualifying unavailable for circuit details");
                None
            }
        };

        Ok(assemble::circuit::circuit_payload(year, gp_name, &race, qualifying.as_ref(), &self.resolver))
    }

    /// Event names of a season.
    pub async fn race_list(&self, year: i32) -> Result<RaceList> {
        let races = self.provider.event_schedule(year).await?;
        Ok(RaceList { year, races })
    }

    /// Career profile from the reference tables.
    pub fn driver_profile(&self, name: &str) -> Result<DriverProfile> {
        match self.reference.as_deref() {
            Some(reference) => assemble::driver::driver_profile(reference, name),
            None => {
                warn!(driver = name, "Driver profile requested without reference data");
                Err(PaddockError::DriverNotFound { name: name.to_string() })
            }
        }
    }

    /// Convert a result into the request-boundary response, logging failures.
    pub fn respond<T>(result: Result<T>) -> ApiResponse<T> {
        match result {
            Ok(payload) => ApiResponse::Ok(payload),
            Err(e) => {
                error!(error = %e, suggestions = ?e.recovery_suggestions(), "Request failed");
                ApiResponse::Error { error: e.to_string() }
            }
        }
    }
}

impl std::fmt::Debug for Paddock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paddock")
            .field("resolver", &self.resolver)
            .field("reference", &self.reference.is_some())
            .finish_non_exhaustive()
    }
}
