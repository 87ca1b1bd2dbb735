//! Error types for session reformatting.
//!
//! All errors implement `std::error::Error` and carry enough context to be turned into the
//! structured `{"error": "..."}` payload at the request boundary (see [`crate::ApiResponse`]).
//!
//! ## Error Categories
//!
//! - **Provider Errors**: the session provider failed to load a session or has no data for it
//! - **File Errors**: fixture, reference dataset or config files could not be read
//! - **Parse Errors**: a document (YAML, CSV header, config) could not be decoded
//! - **Lookup Errors**: a requested driver profile does not exist in the reference data
//!
//! An unmatched circuit is deliberately *not* an error: the resolver returns `None` and the
//! caller renders partial data. Malformed rows inside reference tables are skipped with a
//! warning rather than surfacing here.
//!
//! ```rust
//! use paddock::PaddockError;
//!
//! let error = PaddockError::provider_failed("timing feed unavailable");
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for paddock operations.
pub type Result<T, E = PaddockError> = std::result::Result<T, E>;

/// Main error type for paddock operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PaddockError {
    #[error("Session provider failed: {reason}")]
    Provider {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("No {session} session found for {year} '{event}'")]
    SessionNotFound { year: i32, event: String, session: String },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Driver not found: {name}")]
    DriverNotFound { name: String },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl PaddockError {
    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            PaddockError::Provider { .. } => vec![
                "Check the session provider is reachable",
                "Verify the year and event identifier exist",
                "Repeat the request once the provider recovers",
            ],
            PaddockError::SessionNotFound { .. } => vec![
                "Check the event name or round number",
                "Verify the session type was held at this event",
            ],
            PaddockError::File { .. } => vec![
                "Check file exists and is readable",
                "Verify the configured data directories",
            ],
            PaddockError::Parse { .. } => vec![
                "Check data format compatibility",
                "Verify source data integrity",
            ],
            PaddockError::DriverNotFound { .. } => vec![
                "Check the driver's full name spelling",
                "Use the reference driverRef instead of the display name",
            ],
            PaddockError::Config { .. } => vec![
                "Check PADDOCK_* environment variables",
                "Validate the YAML configuration file",
            ],
        }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        PaddockError::File { path, source }
    }

    /// Helper constructor for provider errors.
    pub fn provider_failed(reason: impl Into<String>) -> Self {
        PaddockError::Provider { reason: reason.into(), source: None }
    }

    /// Helper constructor for provider errors with source.
    pub fn provider_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        PaddockError::Provider { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for missing sessions.
    pub fn session_not_found(year: i32, event: impl Into<String>, session: impl Into<String>) -> Self {
        PaddockError::SessionNotFound { year, event: event.into(), session: session.into() }
    }

    /// Helper constructor for parse errors.
    pub fn parse(context: impl Into<String>, details: impl ToString) -> Self {
        PaddockError::Parse { context: context.into(), details: details.to_string() }
    }
}

impl From<std::io::Error> for PaddockError {
    fn from(err: std::io::Error) -> Self {
        PaddockError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

impl From<csv::Error> for PaddockError {
    fn from(err: csv::Error) -> Self {
        PaddockError::Parse { context: "CSV reference data".to_string(), details: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
          #[test]
          fn error_messages_carry_their_context(
            reason in ".*",
            event in "[A-Za-z ]{1,30}",
            year in 1950i32..2100i32,
            details in ".*",
            name in "\\w+"
          ) {
            let provider = PaddockError::provider_failed(reason.clone());
            prop_assert!(provider.to_string().contains(&reason));

            let missing = PaddockError::session_not_found(year, event.clone(), "R");
            let msg = missing.to_string();
            prop_assert!(msg.contains(&event));
            prop_assert!(msg.contains(&year.to_string()));

            let parse = PaddockError::parse("fixture", details.clone());
            prop_assert!(parse.to_string().contains(&details));

            let driver = PaddockError::DriverNotFound { name: name.clone() };
            prop_assert!(driver.to_string().contains(&name));
          }

          #[test]
          fn io_errors_convert_to_file_variant(reason in ".*") {
            let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, reason.clone());
            let converted: PaddockError = io_err.into();
            match converted {
              PaddockError::File { source, .. } => {
                prop_assert_eq!(source.to_string(), reason);
              }
              _ => prop_assert!(false, "Expected File error from io::Error conversion"),
            }
          }
        }
    }

    #[test]
    fn provider_source_chain_is_preserved() {
        let inner = std::io::Error::other("socket closed");
        let error = PaddockError::provider_failed_with_source("session load", Box::new(inner));

        let source = std::error::Error::source(&error).expect("source should be attached");
        assert_eq!(source.to_string(), "socket closed");
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<PaddockError>();

        let error = PaddockError::provider_failed("test");
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn every_variant_has_recovery_guidance() {
        let errors = [
            PaddockError::provider_failed("x"),
            PaddockError::session_not_found(2024, "Monaco", "Q"),
            PaddockError::file_error(PathBuf::from("/tmp/x"), std::io::Error::other("x")),
            PaddockError::parse("ctx", "details"),
            PaddockError::DriverNotFound { name: "Nobody".into() },
            PaddockError::Config { reason: "bad".into() },
        ];

        for error in &errors {
            let suggestions = error.recovery_suggestions();
            assert!(!suggestions.is_empty(), "{error} has no suggestions");
            assert!(suggestions.iter().all(|s| s.len() > 5));
        }
    }
}
