// --- File: crates/agendify_gcal/src/handlers.rs ---
use crate::auth::AuthLifecycle;
use crate::logic::{
    build_calendar_event, compute_slots, validate_intent, BookingIntent, BookingError,
    DayAvailability, SlotRules,
};
use crate::service::GoogleCalendarService;
use agendify_common::services::CalendarService;
use agendify_config::AppConfig;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Json, Redirect},
};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info};

// Shared state for the booking handlers.
pub struct GcalState {
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthLifecycle>,
    pub calendar: Arc<GoogleCalendarService>,
    pub rules: SlotRules,
    pub time_zone: Tz,
}

impl GcalState {
    pub fn new(
        config: Arc<AppConfig>,
        auth: Arc<AuthLifecycle>,
        calendar: Arc<GoogleCalendarService>,
    ) -> Self {
        let rules = SlotRules::from_config(&config.booking);
        let time_zone =
            Tz::from_str(&config.gcal.time_zone).unwrap_or(Tz::America__Sao_Paulo);
        GcalState {
            config,
            auth,
            calendar,
            rules,
            time_zone,
        }
    }
}

type ApiError = (StatusCode, Json<Value>);

// 4xx bodies use the wire key "erro", 5xx use "error".
fn erro(status: StatusCode, message: &str) -> ApiError {
    let key = if status.is_server_error() { "error" } else { "erro" };
    (status, Json(json!({ key: message })))
}

#[derive(Serialize)]
pub struct AuthUrlResponse {
    #[serde(rename = "authUrl")]
    pub auth_url: String,
}

/// Handler to generate the external authorization URL.
#[axum::debug_handler]
pub async fn generate_auth_url_handler(
    State(state): State<Arc<GcalState>>,
) -> Json<AuthUrlResponse> {
    Json(AuthUrlResponse {
        auth_url: state.auth.authorization_url(),
    })
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// Handler for the OAuth callback: exchanges the code and sends the browser
/// back to the application root, where the client relay resumes any pending
/// booking.
#[axum::debug_handler]
pub async fn auth_callback_handler(
    State(state): State<Arc<GcalState>>,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect, ApiError> {
    let code = query.code.as_deref().ok_or_else(|| {
        erro(
            StatusCode::BAD_REQUEST,
            "parâmetro code ausente no callback",
        )
    })?;

    match state.auth.exchange_code(code).await {
        Ok(_) => Ok(Redirect::to(&state.config.oauth.post_auth_redirect)),
        Err(e) => {
            error!("Authorization code exchange failed: {e}");
            Err(erro(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro ao autenticar",
            ))
        }
    }
}

#[derive(Serialize)]
pub struct EventoCriado {
    pub id: String,
    #[serde(rename = "htmlLink", skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
}

#[derive(Serialize)]
pub struct CriarEventoResponse {
    pub mensagem: String,
    pub evento: EventoCriado,
}

/// Handler to book an appointment: validation, credential check, then a
/// single event insert.
#[axum::debug_handler]
pub async fn create_event_handler(
    State(state): State<Arc<GcalState>>,
    Json(payload): Json<BookingIntent>,
) -> Result<Json<CriarEventoResponse>, ApiError> {
    let intent = validate_intent(&payload, Utc::now(), &state.rules).map_err(|e| match e {
        BookingError::Validation(message) => erro(StatusCode::BAD_REQUEST, &message),
        other => erro(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string()),
    })?;

    // Credential check strictly precedes event creation; an unauthorized
    // service never contacts the provider.
    let Some(credential) = state.auth.current_credential().await else {
        return Err(erro(
            StatusCode::UNAUTHORIZED,
            "Não autenticado no Google",
        ));
    };

    let event = build_calendar_event(&intent, &state.config.gcal);
    match state
        .calendar
        .create_event(&credential.access_token, &state.config.gcal.calendar_id, event)
        .await
    {
        Ok(receipt) => {
            info!(
                "Booked appointment for {} at {} (event {})",
                intent.nome, intent.start, receipt.event_id
            );
            Ok(Json(CriarEventoResponse {
                mensagem: "Evento criado com sucesso!".to_string(),
                evento: EventoCriado {
                    id: receipt.event_id,
                    html_link: receipt.html_link,
                },
            }))
        }
        Err(e) => {
            error!("Error creating calendar event: {e}");
            Err(erro(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro ao criar evento no Google Calendar",
            ))
        }
    }
}

#[derive(Deserialize)]
pub struct DisponibilidadeQuery {
    /// Date to check, YYYY-MM-DD.
    pub data: String,
}

#[derive(Serialize)]
pub struct Horario {
    pub inicio: String,
    pub fim: String,
    pub rotulo: String,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DisponibilidadeResponse {
    Fechado,
    Aberto { horarios: Vec<Horario> },
}

/// Handler to list bookable slots for one date.
///
/// A closed weekday and an open day with nothing left are distinct outcomes
/// on the wire.
#[axum::debug_handler]
pub async fn availability_handler(
    State(state): State<Arc<GcalState>>,
    Query(query): Query<DisponibilidadeQuery>,
) -> Result<Json<DisponibilidadeResponse>, ApiError> {
    let date = NaiveDate::parse_from_str(&query.data, "%Y-%m-%d").map_err(|_| {
        erro(
            StatusCode::BAD_REQUEST,
            "data inválida, use o formato YYYY-MM-DD",
        )
    })?;

    let now = Utc::now().with_timezone(&state.time_zone);
    if date < now.date_naive() {
        return Err(erro(StatusCode::BAD_REQUEST, "data no passado"));
    }

    let response = match compute_slots(date, now, &state.rules) {
        DayAvailability::Closed => DisponibilidadeResponse::Fechado,
        DayAvailability::Open(slots) => DisponibilidadeResponse::Aberto {
            horarios: slots
                .into_iter()
                .map(|slot| Horario {
                    inicio: slot.start.to_rfc3339(),
                    fim: slot.end.to_rfc3339(),
                    rotulo: slot.label,
                })
                .collect(),
        },
    };
    Ok(Json(response))
}
