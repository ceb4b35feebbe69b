//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::client::TransportMode;

/// Configuration for the data-access core and the relay server.
///
/// All values can be configured via environment variables with sensible
/// defaults. Optional values degrade gracefully: without a relay URL the
/// client falls back to direct calls, without a cache directory the cache
/// stays in memory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the external stats API
    pub api_base_url: String,
    /// Same-origin relay endpoint URL, if one is deployed
    pub relay_url: Option<String>,
    /// Route browser-originated requests through the relay
    pub use_relay: bool,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// HTTP port for the relay server binary
    pub server_port: u16,
    /// Namespace prefix for persisted cache keys
    pub cache_namespace: String,
    /// Directory for the persistent cache file (in-memory cache if unset)
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - External API host (default: `https://omeda.city`)
    /// - `RELAY_URL` - Relay endpoint URL (default: unset)
    /// - `USE_RELAY` - Route requests through the relay (default: false)
    /// - `REQUEST_TIMEOUT_SECS` - Request timeout in seconds (default: 15)
    /// - `SERVER_PORT` - Relay server port (default: 3000)
    /// - `CACHE_NAMESPACE` - Cache key prefix (default: `predecessor_stats_`)
    /// - `CACHE_DIR` - Persistent cache directory (default: unset, in-memory)
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "https://omeda.city".to_string()),
            relay_url: env::var("RELAY_URL").ok().filter(|v| !v.is_empty()),
            use_relay: env::var("USE_RELAY")
                .ok()
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cache_namespace: env::var("CACHE_NAMESPACE")
                .unwrap_or_else(|_| "predecessor_stats_".to_string()),
            cache_dir: env::var("CACHE_DIR").ok().map(PathBuf::from),
        }
    }

    /// Selects the transport mode for the remote data client.
    ///
    /// Relay routing requires both the switch and a configured relay URL;
    /// otherwise requests go directly to the external host.
    pub fn transport_mode(&self) -> TransportMode {
        if self.use_relay && self.relay_url.is_some() {
            TransportMode::ViaRelay
        } else {
            TransportMode::Direct
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://omeda.city".to_string(),
            relay_url: None,
            use_relay: false,
            request_timeout_secs: 15,
            server_port: 3000,
            cache_namespace: "predecessor_stats_".to_string(),
            cache_dir: None,
        }
    }
}
