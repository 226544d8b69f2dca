// --- File: crates/agendify_relay/src/lib.rs ---
//! Client-side relay guaranteeing a submitted booking intent is not silently
//! dropped when authorization is required mid-submission, and is replayed
//! exactly once after the user returns from the external authorization page.

use thiserror::Error;

pub mod relay;
pub mod store;

pub use relay::{BookingConfirmation, BookingRelay, SubmitOutcome};
pub use store::{PendingIntentStore, PENDING_KEY};

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Pending intent storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Pending intent serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Replay dispatch failed: {0}")]
    Dispatch(String),
}
