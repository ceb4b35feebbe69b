//! Error types for the data-access core and relay
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == API Error Enum ==
/// Unified error type for remote data-access operations.
///
/// Cache failures never surface through this type: the cache layer degrades
/// to misses and best-effort cleanup on its own (see `cache::store`).
#[derive(Error, Debug)]
pub enum ApiError {
    /// Upstream returned a non-2xx status. Not retried.
    #[error("API error: {status} {text}")]
    Status { status: u16, text: String },

    /// The fixed per-request timeout elapsed before a response arrived
    #[error("request timed out; the relay may be down, please try again later")]
    Timeout,

    /// Transport-level failure (DNS, connect, TLS, relay unreachable)
    #[error("network error: unable to reach the API ({0}); the relay may be down, please try again later")]
    Network(String),

    /// A request URL could not be constructed
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// Response body was not the expected JSON shape
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response matched neither the expected type nor a relay envelope
    #[error("unrecognized response envelope: {0}")]
    Envelope(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                text: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            }
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

// == IntoResponse Implementation ==
/// Maps API errors onto relay responses: upstream status errors are mirrored
/// with their original status code, everything else is a 500.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Status { status, text } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                format!("API request failed: {}", text),
            ),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for data-access operations.
pub type Result<T> = std::result::Result<T, ApiError>;
