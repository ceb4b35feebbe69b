//! TTL Cache Module
//!
//! Persistent TTL cache over a flat key/value storage backend. Entries are
//! JSON `{data, timestamp, ttl}` envelopes under a namespace prefix, expired
//! lazily on read, and recovered from quota exhaustion by purging.
//!
//! Every operation is non-throwing from the caller's perspective: failures
//! degrade to a cache miss or best-effort cleanup, never an error. Write
//! loss is acceptable for a cache; lost writes are counted in the stats.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::storage::{
    utf16_size_bytes, FileStorage, MemoryStorage, StorageBackend, StorageError,
};
use crate::cache::{CacheEntry, CacheStats};
use crate::config::Config;

// == TTL Cache ==
/// Namespaced TTL cache over a persistent string store.
pub struct TtlCache {
    /// Backing key/value store
    storage: Arc<dyn StorageBackend>,
    /// Prefix scoping all cache keys, so bulk operations never touch
    /// unrelated persisted data
    namespace: String,
    /// Behavior counters
    stats: Mutex<CacheStats>,
}

impl TtlCache {
    // == Constructor ==
    /// Creates a cache over `storage`, scoping all keys with `namespace`.
    pub fn new(storage: Arc<dyn StorageBackend>, namespace: impl Into<String>) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
            stats: Mutex::new(CacheStats::new()),
        }
    }

    /// Creates the cache described by `config`: file-backed under
    /// `cache_dir` when one is set, in-memory otherwise. Keys are scoped
    /// with the configured `cache_namespace`.
    ///
    /// An unusable cache directory degrades to in-memory storage with a
    /// warning, keeping construction infallible like every other cache
    /// operation.
    pub fn from_config(config: &Config) -> Self {
        let storage: Arc<dyn StorageBackend> = match &config.cache_dir {
            Some(dir) => match FileStorage::new(dir.clone()) {
                Ok(storage) => Arc::new(storage),
                Err(e) => {
                    warn!(
                        "Cache directory {} unusable ({}), falling back to in-memory storage",
                        dir.display(),
                        e
                    );
                    Arc::new(MemoryStorage::new())
                }
            },
            None => Arc::new(MemoryStorage::new()),
        };
        Self::new(storage, config.cache_namespace.clone())
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    fn stats_mut(&self) -> std::sync::MutexGuard<'_, CacheStats> {
        self.stats
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // == Get ==
    /// Returns the cached value for `key` if present and not expired.
    ///
    /// An expired entry is deleted before returning `None`. Storage and
    /// deserialization failures are treated as misses.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let storage_key = self.prefixed(key);

        let raw = match self.storage.get_item(&storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.stats_mut().record_miss();
                return None;
            }
            Err(e) => {
                warn!("Cache read error for {}: {}", key, e);
                self.stats_mut().record_miss();
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cache entry for {} is corrupted: {}", key, e);
                self.stats_mut().record_miss();
                return None;
            }
        };

        if entry.is_expired() {
            debug!("Cache entry for {} expired, removing", key);
            self.remove(key);
            let mut stats = self.stats_mut();
            stats.record_expiration();
            stats.record_miss();
            return None;
        }

        self.stats_mut().record_hit();
        Some(entry.data)
    }

    // == Set ==
    /// Stores `data` under `key` with the given TTL.
    ///
    /// On quota exhaustion, purges every expired entry in the namespace and
    /// retries the write once; if it still fails, purges the whole namespace
    /// and gives up silently.
    pub fn set<T: Serialize>(&self, key: &str, data: &T, ttl: Duration) {
        let entry = CacheEntry::new(data, ttl);
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Cache write error for {}: {}", key, e);
                self.stats_mut().record_write_failure();
                return;
            }
        };

        let storage_key = self.prefixed(key);
        match self.storage.set_item(&storage_key, &raw) {
            Ok(()) => {}
            Err(StorageError::QuotaExceeded) => {
                debug!("Cache storage full, purging expired entries");
                self.clear_expired();
                if self.storage.set_item(&storage_key, &raw).is_err() {
                    warn!("Cache write for {} failed after purge, clearing cache", key);
                    self.clear_all();
                    self.stats_mut().record_write_failure();
                }
            }
            Err(e) => {
                warn!("Cache write error for {}: {}", key, e);
                self.stats_mut().record_write_failure();
            }
        }
    }

    // == Remove ==
    /// Deletes `key` unconditionally. Idempotent.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove_item(&self.prefixed(key)) {
            warn!("Cache remove error for {}: {}", key, e);
        }
    }

    // == Clear Expired ==
    /// Scans the namespace and deletes every expired entry.
    ///
    /// Corrupted entries are deleted as a side effect of the scan.
    pub fn clear_expired(&self) {
        for storage_key in self.namespaced_keys() {
            let keep = match self.storage.get_item(&storage_key) {
                Ok(Some(raw)) => match serde_json::from_str::<CacheEntry<serde_json::Value>>(&raw)
                {
                    Ok(entry) => !entry.is_expired(),
                    Err(_) => false,
                },
                Ok(None) => true,
                Err(_) => true,
            };

            if !keep {
                if let Err(e) = self.storage.remove_item(&storage_key) {
                    warn!("Cache cleanup error for {}: {}", storage_key, e);
                }
            }
        }
    }

    // == Clear All ==
    /// Deletes every key in the namespace regardless of expiry.
    ///
    /// Keys outside the namespace are untouched.
    pub fn clear_all(&self) {
        for storage_key in self.namespaced_keys() {
            if let Err(e) = self.storage.remove_item(&storage_key) {
                warn!("Cache clear error for {}: {}", storage_key, e);
            }
        }
    }

    // == Size ==
    /// Total serialized size of the namespace in bytes, counted at two
    /// bytes per UTF-16 code unit (the storage cost in browser-style
    /// stores this cache originally fronted).
    pub fn size_bytes(&self) -> usize {
        self.namespaced_keys()
            .iter()
            .filter_map(|storage_key| self.storage.get_item(storage_key).ok().flatten())
            .map(|raw| utf16_size_bytes(&raw))
            .sum()
    }

    // == Stats ==
    /// Returns a snapshot of the behavior counters.
    pub fn stats(&self) -> CacheStats {
        self.stats_mut().clone()
    }

    fn namespaced_keys(&self) -> Vec<String> {
        match self.storage.keys() {
            Ok(keys) => keys
                .into_iter()
                .filter(|k| k.starts_with(&self.namespace))
                .collect(),
            Err(e) => {
                warn!("Cache key scan error: {}", e);
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}
