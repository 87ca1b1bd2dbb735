//! Provider trait for session data sources

use crate::Result;
use crate::session::{Session, SessionKind};

/// Trait for session data sources
///
/// Providers abstract over wherever timing data comes from (a timing library's HTTP
/// backend, exported fixtures, memory) and resolve loose event identifiers themselves.
/// Every call is independent; providers do not retry.
#[async_trait::async_trait]
pub trait SessionProvider: Send + Sync {
    /// Load one session with its event, result and lap tables
    ///
    /// `event` may be a round number (`"5"`), an exact event name, or a fragment that
    /// matches exactly one event loosely (`"monaco"`).
    ///
    /// Returns:
    /// - `Ok(session)` - Session loaded
    /// - `Err(SessionNotFound)` - No such event or session for the year
    /// - `Err(e)` - Transport or decoding failure
    async fn load_session(&self, year: i32, event: &str, kind: SessionKind) -> Result<Session>;

    /// Event names for a season, in schedule order
    async fn event_schedule(&self, year: i32) -> Result<Vec<String>>;
}
