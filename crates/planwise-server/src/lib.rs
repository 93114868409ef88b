mod error;
mod http;
mod state;
mod store;

pub use error::ApiError;
pub use http::{EventCreated, EventInput, NoteInput};
pub use state::{AppState, EventRecord};
pub use store::BoundedStore;

use anyhow::{bail, Context};
use axum::{
    http::HeaderValue,
    routing::get,
    Router,
};
use planwise_config::{Config, ServerConfig};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub const EVENTS_PATH: &str = "/events";
pub const NOTES_PATH: &str = "/notes";
pub const HEALTH_PATH: &str = "/health";

/// Build the application router with CORS and request tracing.
pub fn router(state: AppState, server: &ServerConfig) -> anyhow::Result<Router> {
    Ok(Router::new()
        .route(EVENTS_PATH, get(http::list_events).post(http::create_event))
        .route(NOTES_PATH, get(http::list_notes).post(http::add_note))
        .route(HEALTH_PATH, get(http::health))
        .with_state(state)
        .layer(cors_layer(&server.cors_origins)?)
        .layer(TraceLayer::new_for_http()))
}

/// Credentialed CORS for an explicit origin list.
///
/// A wildcard is refused because browsers reject `*` together with
/// credentials.
fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let mut allowed = Vec::with_capacity(origins.len());
    for origin in origins {
        if origin.trim() == "*" {
            bail!("server.cors_origins must list explicit origins when credentials are allowed");
        }
        allowed.push(
            HeaderValue::from_str(origin.trim())
                .with_context(|| format!("invalid CORS origin {origin:?}"))?,
        );
    }
    info!(origins = ?origins, "CORS origins");
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Run the HTTP facade until Ctrl-C.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let app = router(state, &config.server)?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("binding {}", config.server.bind))?;
    info!(addr = %listener.local_addr()?, model = %config.model.name, "planwise listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
