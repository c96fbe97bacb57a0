//! Urban Soccer RPG API library.
//!
//! The binary in `main.rs` wires configuration, storage and telemetry
//! together; everything a request touches lives here so the integration
//! tests can drive the same router over in-memory stores.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod shutdown;
pub mod state;
pub mod telemetry;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the application router with every context mounted.
pub fn build_router(app_state: AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with the game client's origins once they are fixed.
    Router::new()
        .merge(routes::health::router())
        .nest("/campaigns", routes::campaigns::router())
        .nest("/players", routes::players::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
