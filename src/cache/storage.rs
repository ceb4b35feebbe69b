//! Storage Backend Module
//!
//! The key/value seam underneath the TTL cache. Mirrors the flat string
//! store the cache persists into: get/set/remove by key plus key listing,
//! with quota exhaustion reported separately from other I/O failures so the
//! cache can run its eviction-and-retry recovery.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

// == Storage Error ==
/// Failures a storage backend can report.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing store is out of room; the cache may retry after a purge
    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// Any other read/write failure
    #[error("storage I/O error: {0}")]
    Io(String),
}

/// Convenience Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// == Storage Backend Trait ==
/// A flat persistent string key/value store.
///
/// Operations are atomic with respect to the caller: no method suspends,
/// so concurrent cache reads never observe a half-applied write.
pub trait StorageBackend: Send + Sync {
    /// Reads the raw value stored under `key`, if any.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes `value` under `key`, overwriting any previous value.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Deletes `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Lists every stored key, namespaced or not.
    fn keys(&self) -> StorageResult<Vec<String>>;
}

// == Memory Storage ==
/// In-memory backend, optionally bounded by a byte quota.
///
/// The quota counts stored values at two bytes per UTF-16 code unit, the
/// same accounting the cache reports, so quota-recovery behavior can be
/// exercised deterministically in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    /// Creates an unbounded in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory store that rejects writes once `quota_bytes`
    /// of stored values would be exceeded.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Storage cost of a string in bytes, at two bytes per UTF-16 code unit.
pub fn utf16_size_bytes(value: &str) -> usize {
    value.encode_utf16().count() * 2
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.lock();
        if let Some(quota) = self.quota_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| utf16_size_bytes(v))
                .sum();
            if used + utf16_size_bytes(value) > quota {
                return Err(StorageError::QuotaExceeded);
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.lock().remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.lock().keys().cloned().collect())
    }
}

// == File Storage ==
/// File-backed backend persisting the whole key space as one JSON map.
///
/// Every write rewrites the file; at the cache's scale (a handful of
/// endpoint snapshots) that is cheaper than managing one file per key,
/// and keys never need filesystem sanitization.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates a file-backed store at `dir/cache.json`, creating the
    /// directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(io_to_storage)?;
        Ok(Self {
            path: dir.join("cache.json"),
        })
    }

    fn read_map(&self) -> StorageResult<HashMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                // A corrupted map file is unrecoverable as a whole; start
                // over empty rather than failing every operation.
                Ok(serde_json::from_str(&raw).unwrap_or_default())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(io_to_storage(e)),
        }
    }

    fn write_map(&self, map: &HashMap<String, String>) -> StorageResult<()> {
        let raw = serde_json::to_string(map).map_err(|e| StorageError::Io(e.to_string()))?;
        fs::write(&self.path, raw).map_err(io_to_storage)
    }
}

/// ENOSPC maps to the quota variant so the cache's purge-and-retry path
/// applies to full disks as well as full browser-style quotas.
fn io_to_storage(err: io::Error) -> StorageError {
    if err.raw_os_error() == Some(28) {
        StorageError::QuotaExceeded
    } else {
        StorageError::Io(err.to_string())
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.read_map()?.keys().cloned().collect())
    }
}
