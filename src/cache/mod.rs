//! Cache Module
//!
//! Persistent TTL caching over a flat key/value store, with lazy expiry,
//! corruption tolerance, and quota recovery.

pub mod entry;
pub mod keys;
mod stats;
mod storage;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use storage::{FileStorage, MemoryStorage, StorageBackend, StorageError};
pub use store::TtlCache;

use std::time::Duration;

// == Public Constants ==
/// Default TTL for endpoint responses
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// TTL for the hero reference list; hero data changes at patch cadence
pub const HERO_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// TTL for the item reference list
pub const ITEM_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
