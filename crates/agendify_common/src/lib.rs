// --- File: crates/agendify_common/src/lib.rs ---

// Declare modules within this crate
pub mod logging; // Logging utilities
pub mod models; // Shared wire types
pub mod services; // Service abstractions

// Re-export shared types for easier access
pub use models::BookingIntent;
pub use services::{BoxFuture, BoxedError, CalendarEvent, CalendarService, EventReceipt};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level};
