// --- File: crates/agendify_common/src/models.rs ---
//! Wire types shared by the booking endpoint and the client-side relay.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking intent as submitted by the appointment form.
///
/// Created by the client, consumed exactly once by the booking endpoint. The
/// field names are the wire contract of `POST /criar-evento`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingIntent {
    pub nome: String,
    pub telefone: String,
    /// Selected services, in the order the client picked them. Never empty.
    pub servicos: Vec<String>,
    /// ISO 8601 start of the appointment.
    #[serde(rename = "dataInicio")]
    pub data_inicio: String,
    /// ISO 8601 end, always start + appointment duration.
    #[serde(rename = "dataFim")]
    pub data_fim: String,
    /// Identifier of the booking attempt, generated by the client relay so a
    /// replayed intent stays attributable to one attempt.
    #[serde(rename = "tentativaId", default, skip_serializing_if = "Option::is_none")]
    pub tentativa_id: Option<Uuid>,
}
