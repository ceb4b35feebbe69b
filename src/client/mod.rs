//! Client Module
//!
//! Remote data client for the external stats API: typed endpoint methods,
//! direct-or-relay transport routing, and envelope-tolerant decoding.

pub mod api;
pub mod transport;

pub use api::{ApiClient, CURRENT_MATCH_WINDOW};
pub use transport::{RelayEnvelope, TransportMode};
