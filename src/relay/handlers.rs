//! Relay Handlers
//!
//! HTTP request handlers for the relay server. The relay re-issues inbound
//! requests against the external API server-side, where the upstream's
//! cross-origin restriction does not apply, and echoes the JSON response.

use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{ErrorResponse, HealthResponse};

/// Cache lifetime advertised on successful relay responses.
const RELAY_CACHE_MAX_AGE: Duration = Duration::from_secs(300);

// == Relay State ==
/// Application state shared across relay handlers.
#[derive(Clone)]
pub struct RelayState {
    /// Client used for upstream requests
    pub http: Client,
    /// External API host requests are forwarded to
    pub upstream_base: String,
}

impl RelayState {
    /// Creates relay state from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ApiError::from)?;

        Ok(Self {
            http,
            upstream_base: config.api_base_url.clone(),
        })
    }
}

/// Query parameters for the relay endpoint.
#[derive(Debug, Deserialize)]
pub struct RelayParams {
    /// URL-encoded original path+query on the external API
    pub path: Option<String>,
}

// == Relay Handler ==
/// Handler for GET /api/relay?path=<encoded path+query>
///
/// Forwards the request to the external API and echoes the JSON body with
/// the upstream status mirrored and a public cache-control header attached.
/// Upstream non-2xx statuses become JSON error bodies with the upstream's
/// status code; anything else is a 500.
pub async fn relay_handler(
    State(state): State<RelayState>,
    Query(params): Query<RelayParams>,
) -> Result<Response> {
    let Some(path) = params.path.filter(|p| !p.is_empty()) else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing path parameter")),
        )
            .into_response());
    };

    let upstream_url = format!(
        "{}/{}",
        state.upstream_base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    debug!("Proxying request to {}", upstream_url);

    let response = state
        .http
        .get(&upstream_url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| {
            error!("Relay upstream error for {}: {}", upstream_url, e);
            ApiError::from(e)
        })?;

    let status = response.status();
    if !status.is_success() {
        error!("Relay upstream status {} for {}", status, upstream_url);
        return Err(ApiError::Status {
            status: status.as_u16(),
            text: status.canonical_reason().unwrap_or("unknown status").to_string(),
        });
    }

    let raw = response.text().await.map_err(ApiError::from)?;
    let body: Value = serde_json::from_str(&raw).map_err(ApiError::from)?;

    Ok((
        StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::OK),
        [(
            header::CACHE_CONTROL,
            format!("public, max-age={}", RELAY_CACHE_MAX_AGE.as_secs()),
        )],
        Json(body),
    )
        .into_response())
}

// == Health Handler ==
/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
