// --- File: crates/agendify_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! Trait definitions decoupling the booking logic from the concrete calendar
//! provider, so handlers can be exercised against a mock in tests.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for
/// Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A trait for calendar service operations.
///
/// The booking endpoint only ever inserts events; the created event's
/// lifecycle belongs to the provider afterwards.
pub trait CalendarService: Send + Sync {
    /// Error type returned by calendar service operations.
    type Error: StdError + Send + Sync + 'static;

    /// Create a calendar event using the given bearer access token.
    fn create_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, EventReceipt, Self::Error>;
}

/// An event to be inserted on the shared calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// The start time, RFC 3339.
    pub start_time: String,
    /// The end time, RFC 3339.
    pub end_time: String,
    /// IANA time zone both timestamps are interpreted in.
    pub time_zone: String,
    /// The summary or title of the event.
    pub summary: String,
    /// An optional description of the event.
    pub description: Option<String>,
    /// Optional street address.
    pub location: Option<String>,
    /// Attendee email addresses.
    pub attendees: Vec<String>,
    /// Identifier of the booking attempt that produced this event, stored as
    /// a private extended property on the provider side.
    pub attempt_id: Option<Uuid>,
}

/// Receipt returned by the provider after a successful insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventReceipt {
    /// Opaque provider identifier of the created event.
    pub event_id: String,
    /// User-facing link to the event.
    pub html_link: Option<String>,
}
