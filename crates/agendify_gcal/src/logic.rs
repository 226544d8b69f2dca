// --- File: crates/agendify_gcal/src/logic.rs ---
//! Slot planning, intent validation and event construction.

use agendify_config::{BookingConfig, GcalConfig};
pub use agendify_common::models::BookingIntent;
use agendify_common::services::CalendarEvent;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Weekday};
use chrono_tz::Tz;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::service::GcalServiceError;

// --- Error Handling ---
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("Não autenticado no Google")]
    Unauthenticated,
    #[error("Calendar service error: {0}")]
    Scheduling(#[from] GcalServiceError),
}

// --- Data Structures ---

/// A validated intent, consumed exactly once by the booking endpoint.
#[derive(Debug, Clone)]
pub struct ValidatedIntent {
    pub nome: String,
    pub telefone: String,
    pub servicos: Vec<String>,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub attempt_id: Option<Uuid>,
}

/// One bookable candidate start in the salon's time zone.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilitySlot {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// "HH:MM" as shown in the form's hour selector.
    pub label: String,
}

/// Availability outcome for one calendar date. An open day with no remaining
/// slots is a valid outcome distinct from a closed day.
#[derive(Debug)]
pub enum DayAvailability {
    Closed,
    Open(Vec<AvailabilitySlot>),
}

/// Business-hour rules the planner applies.
#[derive(Debug, Clone)]
pub struct SlotRules {
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub step: Duration,
    pub appointment: Duration,
    pub closed_weekdays: Vec<Weekday>,
}

impl SlotRules {
    /// Builds rules from configuration, falling back to the salon defaults
    /// on malformed times.
    pub fn from_config(config: &BookingConfig) -> Self {
        let open = NaiveTime::parse_from_str(&config.open_time, "%H:%M")
            .unwrap_or_else(|_| NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        let close = NaiveTime::parse_from_str(&config.close_time, "%H:%M")
            .unwrap_or_else(|_| NaiveTime::from_hms_opt(19, 0, 0).unwrap());
        SlotRules {
            open,
            close,
            step: Duration::minutes(i64::from(config.slot_minutes.max(1))),
            appointment: Duration::minutes(i64::from(config.appointment_minutes.max(1))),
            closed_weekdays: config.closed_weekdays(),
        }
    }
}

// --- Availability Logic ---

/// Computes the bookable slots for `date`.
///
/// Candidate starts run from opening time in `step` increments, strictly
/// before closing time. When `date` is `now`'s calendar date, candidates at
/// or before `now` are dropped (no booking of elapsed slots). Results are
/// ascending by start time.
pub fn compute_slots(date: NaiveDate, now: DateTime<Tz>, rules: &SlotRules) -> DayAvailability {
    if rules.closed_weekdays.contains(&date.weekday()) {
        return DayAvailability::Closed;
    }

    let tz = now.timezone();
    let same_day = date == now.date_naive();
    let mut slots = Vec::new();

    let day_open = date.and_time(rules.open);
    let mut candidate = day_open;
    while candidate.time() < rules.close && candidate.date() == date {
        // Skips local times a DST transition makes ambiguous or nonexistent.
        if let Some(start) = tz.from_local_datetime(&candidate).single() {
            if !(same_day && start <= now) {
                slots.push(AvailabilitySlot {
                    start,
                    end: start + rules.appointment,
                    label: candidate.time().format("%H:%M").to_string(),
                });
            }
        }
        candidate += rules.step;
    }

    DayAvailability::Open(slots)
}

// --- Intent Validation ---

/// Validates the raw payload shape and the booking invariants.
pub fn validate_intent(
    request: &BookingIntent,
    now: DateTime<chrono::Utc>,
    rules: &SlotRules,
) -> Result<ValidatedIntent, BookingError> {
    if request.nome.trim().is_empty() {
        return Err(BookingError::Validation("nome é obrigatório".to_string()));
    }
    if request.telefone.trim().is_empty() {
        return Err(BookingError::Validation(
            "telefone é obrigatório".to_string(),
        ));
    }
    if request.servicos.is_empty() || request.servicos.iter().all(|s| s.trim().is_empty()) {
        return Err(BookingError::Validation(
            "selecione pelo menos um serviço".to_string(),
        ));
    }

    let start = DateTime::parse_from_rfc3339(&request.data_inicio)
        .map_err(|_| BookingError::Validation("dataInicio inválida".to_string()))?;
    let end = DateTime::parse_from_rfc3339(&request.data_fim)
        .map_err(|_| BookingError::Validation("dataFim inválida".to_string()))?;

    if end - start != rules.appointment {
        return Err(BookingError::Validation(format!(
            "o agendamento deve durar {} minutos",
            rules.appointment.num_minutes()
        )));
    }
    if start <= now {
        return Err(BookingError::Validation(
            "dataInicio deve estar no futuro".to_string(),
        ));
    }

    Ok(ValidatedIntent {
        nome: request.nome.trim().to_string(),
        telefone: request.telefone.trim().to_string(),
        servicos: request.servicos.clone(),
        start,
        end,
        attempt_id: request.tentativa_id,
    })
}

// --- Booking Logic ---

/// Builds the provider event description for a validated intent.
pub fn build_calendar_event(intent: &ValidatedIntent, gcal: &GcalConfig) -> CalendarEvent {
    CalendarEvent {
        start_time: intent.start.to_rfc3339(),
        end_time: intent.end.to_rfc3339(),
        time_zone: gcal.time_zone.clone(),
        summary: format!("Agendamento - {}", intent.nome),
        description: Some(format!(
            "Serviços: {} | Telefone: {}",
            intent.servicos.join(", "),
            intent.telefone
        )),
        location: gcal.location.clone(),
        attendees: gcal.business_email.iter().cloned().collect(),
        attempt_id: intent.attempt_id,
    }
}
