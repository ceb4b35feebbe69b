//! Relay Routes
//!
//! Configures the Axum router for the relay server.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health_handler, relay_handler, RelayState};

/// Creates the relay router.
///
/// # Endpoints
/// - `GET /api/relay?path=<encoded>` - Forward a request to the external API
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: allows any origin; the relay exists precisely to serve
///   browser-originated requests the upstream rejects
/// - Tracing: logs all requests
pub fn create_router(state: RelayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/relay", get(relay_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
