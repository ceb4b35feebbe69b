//! Relay Module
//!
//! HTTP handlers and routing for the same-origin relay that forwards
//! browser-originated requests to the external API.
//!
//! # Endpoints
//! - `GET /api/relay?path=<encoded>` - Forward a request to the external API
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::{RelayParams, RelayState};
pub use routes::create_router;
