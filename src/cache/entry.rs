//! Cache Entry Module
//!
//! Defines the persisted envelope for individual cache entries with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// The JSON envelope persisted for every cached value.
///
/// An entry is valid while `now - timestamp <= ttl`; once that window has
/// passed it is logically deleted on the next read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry<T> {
    /// The cached payload, stored unchanged
    pub data: T,
    /// Creation timestamp (Unix milliseconds)
    pub timestamp: u64,
    /// Time-to-live in milliseconds
    pub ttl: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            timestamp: current_timestamp_ms(),
            ttl: ttl.as_millis() as u64,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has outlived its TTL.
    ///
    /// Boundary condition: an entry is still valid when exactly `ttl`
    /// milliseconds have elapsed, and expired one millisecond later.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms().saturating_sub(self.timestamp) > self.ttl
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        let age = current_timestamp_ms().saturating_sub(self.timestamp);
        self.ttl.saturating_sub(age)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
