//! Predstats - Cached data-access core for the Omeda City stats API
//!
//! Provides a persistent TTL cache, a relay-aware remote data client, a
//! cache-backed game data service, and the same-origin relay endpoint.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod game_data;
pub mod models;
pub mod relay;

pub use cache::TtlCache;
pub use client::{ApiClient, TransportMode};
pub use config::Config;
pub use error::{ApiError, Result};
pub use game_data::GameDataService;
pub use relay::RelayState;
