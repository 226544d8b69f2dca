// File: services/agendify_backend/src/main.rs
use agendify_common::logging;
use agendify_config::load_config;
use agendify_gcal::routes as gcal_routes;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

#[tokio::main]
async fn main() {
    logging::init();

    let config = Arc::new(load_config().expect("Failed to load config"));

    let booking_router = gcal_routes::routes(config.clone())
        .expect("Failed to initialize the calendar credential lifecycle");

    let mut app = Router::new().merge(booking_router);

    // Serve the appointment form's static assets, when configured.
    if let Some(static_dir) = &config.static_dir {
        info!("Serving static assets from {static_dir}");
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.unwrap();
    info!("Starting server at http://{addr}");

    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}
