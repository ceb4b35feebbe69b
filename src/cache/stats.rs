//! Cache Statistics Module
//!
//! Tracks cache behavior counters: hits, misses, lazy expirations, and
//! write failures. Write failures are otherwise absorbed silently by the
//! cache, so the counter is the only signal that persistent storage is
//! unhealthy.

use serde::Serialize;

// == Cache Stats ==
/// Cache behavior counters.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CacheStats {
    /// Reads that returned a valid cached value
    pub hits: u64,
    /// Reads that found nothing usable (absent, corrupted, or expired)
    pub misses: u64,
    /// Entries removed lazily because a read found them expired
    pub expirations: u64,
    /// Writes lost after the full eviction-and-retry recovery failed
    pub write_failures: u64,
}

impl CacheStats {
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates the cache hit rate, 0.0 if no reads have happened.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn record_write_failure(&mut self) {
        self.write_failures += 1;
    }
}
