// Library root - the binaries and integration tests build on these

pub mod app_state;
pub mod background;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use app_state::AppState;
pub use config::Config;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Routes served by the API. Kept separate from `main` so tests can drive it directly.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/events", get(handlers::get_events))
        .route("/sync/status", get(handlers::get_sync_status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
