// --- File: crates/agendify_relay/src/relay.rs ---
//! The booking relay: submits intents and replays a pending one exactly once
//! after the external authorization round trip.

use agendify_common::models::BookingIntent;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::store::PendingIntentStore;
use crate::RelayError;

/// Confirmation payload of a successful booking.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfirmation {
    pub mensagem: String,
    pub evento: CreatedEvent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedEvent {
    pub id: String,
    #[serde(rename = "htmlLink", default)]
    pub html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthUrlResponse {
    #[serde(rename = "authUrl")]
    auth_url: String,
}

/// Outcome of one submission or replay.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The appointment is on the calendar.
    Booked(BookingConfirmation),
    /// The service is unauthorized; the intent was persisted and the caller
    /// must navigate to `auth_url` to complete consent.
    AuthorizationPending { auth_url: String },
    /// The server rejected the booking; the user may correct and resubmit.
    Rejected { status: u16, message: String },
}

/// Drives a booking intent through the endpoint, preserving it across the
/// authorization redirect and replaying it at most once on return.
pub struct BookingRelay {
    http: reqwest::Client,
    base_url: String,
    store: PendingIntentStore,
}

impl BookingRelay {
    pub fn new(base_url: &str, store: PendingIntentStore) -> Self {
        BookingRelay {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    /// Submits a fresh booking intent.
    ///
    /// Stamps the intent with a per-attempt identifier, so whichever attempt
    /// ends up creating the calendar event stays attributable. On an
    /// unauthorized response the intent is persisted verbatim under the
    /// well-known key before the authorization URL is fetched.
    pub async fn submit(&self, mut intent: BookingIntent) -> Result<SubmitOutcome, RelayError> {
        if intent.tentativa_id.is_none() {
            intent.tentativa_id = Some(Uuid::new_v4());
        }

        let response = self
            .http
            .post(format!("{}/criar-evento", self.base_url))
            .json(&intent)
            .send()
            .await?;

        if response.status().as_u16() == 401 {
            self.store.save(&intent)?;
            let auth_url = self.fetch_auth_url().await?;
            info!("Booking deferred pending authorization");
            return Ok(SubmitOutcome::AuthorizationPending { auth_url });
        }
        Self::interpret(response).await
    }

    /// Replays a pending intent after the authorization round trip.
    ///
    /// Returns `Ok(None)` when nothing was pending. The well-known key is
    /// deleted as soon as the resubmission is dispatched, never on response:
    /// even a lost response leaves at most this one replay.
    pub async fn resume(&self) -> Result<Option<SubmitOutcome>, RelayError> {
        let Some(pending) = self.store.load()? else {
            return Ok(None);
        };
        info!("Resuming pending booking for {}", pending.nome);

        let request = self
            .http
            .post(format!("{}/criar-evento", self.base_url))
            .json(&pending)
            .send();
        let in_flight = tokio::spawn(request);
        self.store.clear()?;

        let response = in_flight
            .await
            .map_err(|e| RelayError::Dispatch(e.to_string()))??;
        if response.status().as_u16() == 401 {
            // Still unauthorized after the round trip; the replay is spent.
            warn!("Replay rejected as unauthorized, booking dropped");
            let message = response.text().await.unwrap_or_default();
            return Ok(Some(SubmitOutcome::Rejected {
                status: 401,
                message,
            }));
        }
        Self::interpret(response).await.map(Some)
    }

    async fn interpret(response: reqwest::Response) -> Result<SubmitOutcome, RelayError> {
        let status = response.status();
        if status.is_success() {
            let confirmation: BookingConfirmation = response.json().await?;
            info!("Booking confirmed, event {}", confirmation.evento.id);
            return Ok(SubmitOutcome::Booked(confirmation));
        }
        Ok(SubmitOutcome::Rejected {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        })
    }

    async fn fetch_auth_url(&self) -> Result<String, RelayError> {
        let response = self
            .http
            .get(format!("{}/gerar-url-autorizacao", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        let body: AuthUrlResponse = response.json().await?;
        Ok(body.auth_url)
    }
}
