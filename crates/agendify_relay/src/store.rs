// --- File: crates/agendify_relay/src/store.rs ---
//! Durable client-side storage for a pending booking intent.
//!
//! One well-known key holds the intent verbatim while the user is away on
//! the external authorization page. Saving overwrites whatever was pending:
//! the relay carries at most one pending booking at a time.

use agendify_common::models::BookingIntent;
use std::path::{Path, PathBuf};

use crate::RelayError;

/// File name of the well-known key.
pub const PENDING_KEY: &str = "agendamento_pendente.json";

/// Stores the pending [`BookingIntent`] under the well-known key inside a
/// caller-chosen directory.
pub struct PendingIntentStore {
    path: PathBuf,
}

impl PendingIntentStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        PendingIntentStore {
            path: dir.as_ref().join(PENDING_KEY),
        }
    }

    /// Persists the intent, replacing any previously pending one.
    pub fn save(&self, intent: &BookingIntent) -> Result<(), RelayError> {
        let json = serde_json::to_string(intent)?;
        std::fs::write(&self.path, json)?;
        tracing::info!("Stored pending booking at {:?}", self.path);
        Ok(())
    }

    /// Reads the pending intent, if one is stored.
    pub fn load(&self) -> Result<Option<BookingIntent>, RelayError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Deletes the well-known key. A missing key is not an error.
    pub fn clear(&self) -> Result<(), RelayError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            tracing::info!("Cleared pending booking");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_intent() -> BookingIntent {
        BookingIntent {
            nome: "Ana".to_string(),
            telefone: "11999999999".to_string(),
            servicos: vec!["corte".to_string(), "escova".to_string()],
            data_inicio: "2025-03-11T10:00:00-03:00".to_string(),
            data_fim: "2025-03-11T11:00:00-03:00".to_string(),
            tentativa_id: Some(Uuid::new_v4()),
        }
    }

    #[test]
    fn round_trips_intent_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = PendingIntentStore::new(dir.path());
        assert!(store.load().unwrap().is_none());

        let intent = sample_intent();
        store.save(&intent).unwrap();

        let loaded = store.load().unwrap().unwrap();
        // All fields, including service order, survive bit-for-bit.
        assert_eq!(loaded, intent);
    }

    #[test]
    fn save_overwrites_previous_pending_intent() {
        let dir = tempfile::tempdir().unwrap();
        let store = PendingIntentStore::new(dir.path());

        let first = sample_intent();
        store.save(&first).unwrap();

        let mut second = sample_intent();
        second.nome = "Bia".to_string();
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap().unwrap().nome, "Bia");
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = PendingIntentStore::new(dir.path());
        store.clear().unwrap();

        store.save(&sample_intent()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
