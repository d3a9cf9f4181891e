//! State stores built on the cache and data layers
//!
//! Each store is an explicit context object constructed with its
//! collaborators injected: a source for remotely-backed stores, an
//! optional cache manager for persisted ones. Actions take `&mut self`,
//! so at most one action per store instance is ever in flight.

pub mod deals;
pub mod navigation;
pub mod saved;

pub use deals::{DealsStore, DEALS_CACHE_KEY, DEALS_CACHE_TTL};
pub use navigation::NavigationStore;
pub use saved::{SavedDealsError, SavedDealsStore, SAVED_DEALS_CACHE_KEY, TAGS_CACHE_KEY};
