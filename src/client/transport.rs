//! Transport Module
//!
//! Request URL construction for the two routing modes, and decoding of
//! possibly envelope-wrapped relay responses.

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, Result};

// == Transport Mode ==
/// How requests reach the external API.
///
/// Selected once by the composition root: browser-context deployments route
/// through the same-origin relay because the external API does not grant
/// cross-origin permission; everything else calls the host directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Call the external host directly
    Direct,
    /// Rewrite requests onto the same-origin relay endpoint
    ViaRelay,
}

// == URL Construction ==
/// Builds the direct request URL: base + path + query pairs.
pub fn direct_url(base: &str, path: &str, pairs: &[(String, String)]) -> Result<Url> {
    let mut url = Url::parse(&format!("{}{}", base.trim_end_matches('/'), path))
        .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
    if !pairs.is_empty() {
        let mut query = url.query_pairs_mut();
        for (name, value) in pairs {
            query.append_pair(name, value);
        }
    }
    Ok(url)
}

/// Builds the request URL for the given transport mode.
///
/// In relay mode the original path+query is URL-encoded into a single
/// `path` parameter on the relay endpoint, which re-issues the request
/// server-side where the origin restriction does not apply.
pub fn request_url(
    mode: TransportMode,
    base: &str,
    relay: Option<&str>,
    path: &str,
    pairs: &[(String, String)],
) -> Result<Url> {
    let direct = direct_url(base, path, pairs)?;
    match mode {
        TransportMode::Direct => Ok(direct),
        TransportMode::ViaRelay => {
            let relay = relay.ok_or_else(|| {
                ApiError::InvalidUrl("relay transport selected but no relay URL configured".into())
            })?;
            let original = match direct.query() {
                Some(query) => format!("{}?{}", direct.path(), query),
                None => direct.path().to_string(),
            };
            let mut url =
                Url::parse(relay).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
            url.query_pairs_mut().append_pair("path", &original);
            Ok(url)
        }
    }
}

// == Envelope Decoding ==
/// The wrapper some relays impose around the real payload. The `contents`
/// field may itself be a JSON document serialized as a string.
#[derive(Debug, Deserialize)]
pub struct RelayEnvelope {
    pub contents: Value,
}

/// Decodes a response body into the expected type.
///
/// A body consisting solely of a `contents` field is unwrapped as an
/// envelope before decoding. The unwrap must happen first: endpoints that
/// expect a raw JSON document would otherwise accept the wrapper verbatim,
/// and lenient record types would decode it to an all-defaults record.
/// Anything that is neither an envelope nor the expected shape fails
/// loudly, rather than guessing.
pub fn decode_payload<T: DeserializeOwned>(body: Value) -> Result<T> {
    match body {
        Value::Object(map) if map.len() == 1 && map.contains_key("contents") => {
            let envelope: RelayEnvelope = serde_json::from_value(Value::Object(map))?;
            let inner = match envelope.contents {
                Value::String(raw) => serde_json::from_str(&raw)?,
                value => value,
            };
            serde_json::from_value(inner).map_err(ApiError::from)
        }
        other => serde_json::from_value(other).map_err(|e| {
            ApiError::Envelope(format!(
                "body matches neither the expected shape ({}) nor a relay envelope",
                e
            ))
        }),
    }
}
