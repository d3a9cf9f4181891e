//! Cache manager for persisting store snapshots to disk
//!
//! Provides a `CacheManager` that stores serializable payloads as JSON
//! envelopes carrying a write timestamp, so stores can answer "is this
//! snapshot still fresh" and fall back to the last known state when a
//! remote source is unavailable.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Envelope for cached data stored on disk
///
/// Payload and write timestamp live in a single file, so a snapshot can
/// never exist without the instant it was taken.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// The cached payload
    data: T,
    /// When the payload was written
    cached_at: DateTime<Utc>,
}

/// Timestamp-only view of an envelope, used for validity checks
///
/// Deserializing this instead of `CacheEntry<T>` keeps `is_valid` independent
/// of the payload shape: freshness is a function of the clock alone.
#[derive(Debug, Deserialize)]
struct CacheStamp {
    cached_at: DateTime<Utc>,
}

/// Result of reading from cache, including when the payload was written
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached payload
    pub data: T,
    /// When the payload was originally written
    pub cached_at: DateTime<Utc>,
}

/// Errors that can occur when reading a cache entry
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading the cache file failed
    #[error("cache read failed: {0}")]
    Io(#[from] io::Error),

    /// The cache file does not contain a valid envelope
    #[error("cache entry is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Manages reading and writing cached envelopes on disk
///
/// Entries are stored as JSON files in an XDG-compliant cache directory
/// (`~/.cache/quicknav/` on Linux), one file per key. The cache is
/// best-effort and never authoritative: write failures are logged and
/// swallowed so a broken cache cannot fail the caller's primary operation.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using an XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no
    /// home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "quicknav")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the path to the cache file for the given key
    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Checks whether the entry under `key` was written less than `max_age` ago
    ///
    /// Returns `false` when the entry is absent or unreadable; a snapshot
    /// without a legible timestamp is treated as expired.
    pub fn is_valid(&self, key: &str, max_age: Duration) -> bool {
        let content = match fs::read_to_string(self.cache_path(key)) {
            Ok(content) => content,
            Err(_) => return false,
        };
        let stamp: CacheStamp = match serde_json::from_str(&content) {
            Ok(stamp) => stamp,
            Err(_) => return false,
        };

        let age = Utc::now()
            .signed_duration_since(stamp.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        age < max_age
    }

    /// Writes `data` under `key`, stamped with the current time
    ///
    /// The envelope (payload plus timestamp) lands in one file write.
    /// Failures are logged and swallowed: losing the cache must never block
    /// the caller's primary operation.
    pub fn save<T: Serialize>(&self, key: &str, data: &T) {
        if let Err(e) = self.write_entry(key, data) {
            tracing::warn!(key, error = %e, "failed to save cache entry");
        }
    }

    fn write_entry<T: Serialize>(&self, key: &str, data: &T) -> Result<(), CacheError> {
        self.ensure_dir()?;

        let entry = CacheEntry {
            data,
            cached_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(self.cache_path(key), json)?;

        Ok(())
    }

    /// Reads the entry under `key`
    ///
    /// Returns `None` if the entry doesn't exist or cannot be parsed; parse
    /// and I/O failures are logged but never propagated.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        match self.try_load(key) {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to load cache entry");
                None
            }
        }
    }

    /// Reads the entry under `key`, surfacing read and parse failures
    ///
    /// `Ok(None)` means the entry simply doesn't exist. Callers that must
    /// report corrupt persisted state (rather than silently dropping it)
    /// use this instead of [`load`](Self::load).
    pub fn try_load<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<CachedData<T>>, CacheError> {
        let path = self.cache_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let entry: CacheEntry<T> = serde_json::from_str(&content)?;

        Ok(Some(CachedData {
            data: entry.data,
            cached_at: entry.cached_at,
        }))
    }

    /// Removes the entry under `key`
    ///
    /// Failures are logged and swallowed.
    pub fn clear(&self, key: &str) {
        let path = self.cache_path(key);
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!(key, error = %e, "failed to clear cache entry");
            }
        }
    }
}
