//! Remote deals state store
//!
//! Holds the remotely-sourced deal collection behind a 30-minute disk
//! cache. A fresh cache short-circuits the network entirely; a failed
//! fetch falls back to the last cached snapshot instead of emptying the
//! state.

use std::cmp::Ordering;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cache::CacheManager;
use crate::data::{Deal, DealsSource};

/// Cache key for the remote deal snapshot
pub const DEALS_CACHE_KEY: &str = "blackweek-deals";

/// How long a cached snapshot counts as fresh
pub const DEALS_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// State store for the remote deal collection
#[derive(Debug)]
pub struct DealsStore<S> {
    source: S,
    cache: Option<CacheManager>,
    deals: Vec<Deal>,
    is_loading: bool,
    error: Option<String>,
    last_fetched: Option<DateTime<Utc>>,
}

impl<S: DealsSource> DealsStore<S> {
    /// Creates an empty store backed by the given source and cache
    ///
    /// Without a cache manager the store still works; every fetch just goes
    /// to the source.
    pub fn new(source: S, cache: Option<CacheManager>) -> Self {
        Self {
            source,
            cache,
            deals: Vec::new(),
            is_loading: false,
            error: None,
            last_fetched: None,
        }
    }

    /// The deal collection in source order
    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    /// Number of deals currently held
    pub fn deal_count(&self) -> usize {
        self.deals.len()
    }

    /// Whether a fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The last fetch failure, if the most recent fetch failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// When the collection was last fetched or restored from cache
    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.last_fetched
    }

    /// Deals ranked hottest-first
    ///
    /// Stable sort by temperature descending (missing temperature counts
    /// as 0), ties broken by `created_at` descending; exact ties keep
    /// their input order.
    pub fn sorted_deals(&self) -> Vec<&Deal> {
        let mut sorted: Vec<&Deal> = self.deals.iter().collect();
        sorted.sort_by(|a, b| {
            let temp_a = a.temperature.unwrap_or(0.0);
            let temp_b = b.temperature.unwrap_or(0.0);
            temp_b
                .partial_cmp(&temp_a)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        sorted
    }

    /// Pre-populates state from whatever the cache holds, ignoring validity
    ///
    /// Lets a restarted process show the previous snapshot immediately;
    /// `last_fetched` is restored from the envelope's write timestamp.
    pub fn initialize(&mut self) {
        self.load_from_cache();
    }

    /// Fetches the deal collection, going through the cache
    ///
    /// A fresh cached snapshot is served without any network call unless
    /// `force_refresh` is set. On a successful fetch the collection is
    /// replaced wholesale and the snapshot saved; on failure the error is
    /// recorded and the cache is read as a stale fallback, leaving the
    /// last-known-good state in place. The loading flag is cleared on
    /// every exit path.
    pub async fn fetch_deals(&mut self, force_refresh: bool) {
        if !force_refresh && self.cache_is_valid() {
            self.load_from_cache();
            return;
        }

        self.is_loading = true;
        self.error = None;

        match self.source.fetch_deals().await {
            Ok(deals) => {
                self.deals = deals;
                self.last_fetched = Some(Utc::now());
                self.save_to_cache();
            }
            Err(e) => {
                tracing::warn!(error = %e, "deal fetch failed, falling back to cache");
                self.error = Some(format!("Failed to fetch deals: {}", e));
                self.load_from_cache();
            }
        }

        self.is_loading = false;
    }

    /// Drops the cached snapshot and resets the in-memory collection
    ///
    /// Distinct from letting the TTL expire: the next non-forced fetch
    /// will go to the source.
    pub fn clear_cache(&mut self) {
        if let Some(cache) = &self.cache {
            cache.clear(DEALS_CACHE_KEY);
        }
        self.deals.clear();
        self.last_fetched = None;
    }

    fn cache_is_valid(&self) -> bool {
        self.cache
            .as_ref()
            .is_some_and(|cache| cache.is_valid(DEALS_CACHE_KEY, DEALS_CACHE_TTL))
    }

    fn save_to_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.save(DEALS_CACHE_KEY, &self.deals);
        }
    }

    fn load_from_cache(&mut self) {
        let Some(cache) = &self.cache else {
            return;
        };
        if let Some(cached) = cache.load::<Vec<Deal>>(DEALS_CACHE_KEY) {
            self.deals = cached.data;
            self.last_fetched = Some(cached.cached_at);
        }
    }
}
