// --- File: crates/agendify_gcal/src/service.rs ---
//! Google Calendar service implementation.
//!
//! Implements the [`CalendarService`] trait against the Calendar v3 REST API.
//! Event creation is a single insert; the created event's lifecycle belongs
//! to the provider afterwards.

use agendify_common::services::{BoxFuture, CalendarEvent, CalendarService, EventReceipt};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API error ({status}): {body}")]
    ApiError { status: u16, body: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleCalendarService {
    pub fn new() -> Self {
        Self::with_base_url(CALENDAR_API_BASE)
    }

    /// Points the service at an alternative API base, for tests.
    pub fn with_base_url(base_url: &str) -> Self {
        GoogleCalendarService {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
        }
    }
}

impl Default for GoogleCalendarService {
    fn default() -> Self {
        Self::new()
    }
}

/// Subset of the provider's event resource we read back.
#[derive(Debug, Deserialize)]
struct ApiEvent {
    id: String,
    #[serde(rename = "htmlLink")]
    html_link: Option<String>,
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    /// Inserts one event on the given calendar.
    ///
    /// Fire-and-forget relative to calendar state: no busy-time pre-check and
    /// no automatic retry; a remote rejection surfaces to the caller.
    fn create_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, EventReceipt, Self::Error> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id),
        );
        let access_token = access_token.to_string();

        Box::pin(async move {
            let mut body = serde_json::json!({
                "summary": event.summary,
                "start": { "dateTime": event.start_time, "timeZone": event.time_zone },
                "end": { "dateTime": event.end_time, "timeZone": event.time_zone },
            });
            if let Some(description) = &event.description {
                body["description"] = serde_json::Value::String(description.clone());
            }
            if let Some(location) = &event.location {
                body["location"] = serde_json::Value::String(location.clone());
            }
            if !event.attendees.is_empty() {
                body["attendees"] = serde_json::Value::Array(
                    event
                        .attendees
                        .iter()
                        .map(|email| serde_json::json!({ "email": email }))
                        .collect(),
                );
            }
            if let Some(attempt_id) = event.attempt_id {
                body["extendedProperties"] = serde_json::json!({
                    "private": { "tentativaId": attempt_id.to_string() }
                });
            }

            let response = self
                .client
                .post(&url)
                .bearer_auth(&access_token)
                .json(&body)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(GcalServiceError::ApiError { status, body });
            }

            let created: ApiEvent = response.json().await?;
            info!("Created calendar event {}", created.id);
            Ok(EventReceipt {
                event_id: created.id,
                html_link: created.html_link,
            })
        })
    }
}
