//! Cache module for persisting store snapshots to disk
//!
//! This module provides a cache manager that writes JSON envelopes (payload
//! plus write timestamp) to the filesystem, one file per key. Stores use it
//! to short-circuit remote fetches while a snapshot is fresh and to fall
//! back to the last known state when a remote source is unavailable.

mod manager;

pub use manager::{CacheError, CacheManager, CachedData};
