// --- File: crates/agendify_gcal/src/routes.rs ---

use crate::auth::{AuthError, AuthLifecycle, TokenStore};
use crate::handlers::{
    auth_callback_handler, availability_handler, create_event_handler,
    generate_auth_url_handler, GcalState,
};
use crate::service::GoogleCalendarService;
use agendify_config::AppConfig;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all routes for the booking feature.
pub fn routes(config: Arc<AppConfig>) -> Result<Router, AuthError> {
    let store = TokenStore::new(&config.gcal.token_path);
    let auth = Arc::new(AuthLifecycle::new(config.oauth.clone(), store)?);
    let calendar = Arc::new(GoogleCalendarService::new());
    Ok(build_routes(config, auth, calendar))
}

/// Wires the routes around explicit collaborators, so tests can point the
/// lifecycle and calendar service at mock servers.
pub fn build_routes(
    config: Arc<AppConfig>,
    auth: Arc<AuthLifecycle>,
    calendar: Arc<GoogleCalendarService>,
) -> Router {
    let state = Arc::new(GcalState::new(config, auth, calendar));

    Router::new()
        .route("/gerar-url-autorizacao", get(generate_auth_url_handler))
        .route("/auth/callback", get(auth_callback_handler))
        .route("/criar-evento", post(create_event_handler))
        .route("/horarios-disponiveis", get(availability_handler))
        .with_state(state)
}
