//! Saved deals state store
//!
//! Holds the locally curated deal collection and its tags. Every mutation
//! persists immediately, so on the success path the in-memory state and
//! the on-disk snapshot never diverge.

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::cache::CacheManager;
use crate::data::{NewSavedDeal, SavedDeal, Tag};

/// Cache key for the tag collection
pub const TAGS_CACHE_KEY: &str = "blackweek-tags";

/// Cache key for the saved deal collection
pub const SAVED_DEALS_CACHE_KEY: &str = "blackweek-saved-deals";

/// Validation failures for saved-deal mutations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SavedDealsError {
    /// Tag name was empty after trimming
    #[error("tag name must not be empty")]
    EmptyTagName,

    /// A tag with this name already exists (names compare case-insensitively)
    #[error("tag '{0}' already exists")]
    DuplicateTagName(String),
}

/// State store for user-saved deals and their tags
///
/// The collection is kept newest-first as a structural property: new deals
/// are inserted at the front rather than sorted on read.
#[derive(Debug)]
pub struct SavedDealsStore {
    cache: Option<CacheManager>,
    tags: Vec<Tag>,
    deals: Vec<SavedDeal>,
    is_loading: bool,
    error: Option<String>,
}

impl SavedDealsStore {
    /// Creates an empty store backed by the given cache
    pub fn new(cache: Option<CacheManager>) -> Self {
        Self {
            cache,
            tags: Vec::new(),
            deals: Vec::new(),
            is_loading: false,
            error: None,
        }
    }

    /// Tags in creation order
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Saved deals, newest first
    pub fn deals(&self) -> &[SavedDeal] {
        &self.deals
    }

    /// Whether a load is in flight
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The last validation or load failure
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Creates a tag from `name`
    ///
    /// The name is trimmed first. An empty or case-insensitively duplicate
    /// name is rejected: the failure is recorded in `error`, nothing is
    /// mutated, and the error is returned so callers don't have to inspect
    /// `error` as a side channel. On success the tag is appended, `error`
    /// cleared, and the collection persisted.
    pub fn add_tag(&mut self, name: &str) -> Result<Uuid, SavedDealsError> {
        let name = name.trim();
        if name.is_empty() {
            let err = SavedDealsError::EmptyTagName;
            self.error = Some(err.to_string());
            return Err(err);
        }

        let lowered = name.to_lowercase();
        if self.tags.iter().any(|tag| tag.name.to_lowercase() == lowered) {
            let err = SavedDealsError::DuplicateTagName(name.to_string());
            self.error = Some(err.to_string());
            return Err(err);
        }

        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        let id = tag.id;
        self.tags.push(tag);
        self.error = None;
        self.persist_tags();

        Ok(id)
    }

    /// Removes the tag with the given id, if present
    pub fn remove_tag(&mut self, id: Uuid) {
        self.tags.retain(|tag| tag.id != id);
        self.persist_tags();
    }

    /// Removes all tags
    pub fn clear_tags(&mut self) {
        self.tags.clear();
        self.persist_tags();
    }

    /// Saves a new deal, synthesizing its id and timestamp
    ///
    /// The deal is inserted at the front of the collection: newest-first
    /// ordering is structural, not a computed sort.
    pub fn add_deal(&mut self, new_deal: NewSavedDeal) -> Uuid {
        let deal = SavedDeal {
            id: Uuid::new_v4(),
            title: new_deal.title,
            description: new_deal.description,
            price: new_deal.price,
            original_price: new_deal.original_price,
            discount: new_deal.discount,
            url: new_deal.url,
            tags: new_deal.tags,
            found_at: Utc::now(),
        };
        let id = deal.id;
        self.deals.insert(0, deal);
        self.persist_deals();

        id
    }

    /// Removes the deal with the given id, if present
    pub fn remove_deal(&mut self, id: Uuid) {
        self.deals.retain(|deal| deal.id != id);
        self.persist_deals();
    }

    /// Removes all saved deals
    pub fn clear_deals(&mut self) {
        self.deals.clear();
        self.persist_deals();
    }

    /// Loads both persisted collections
    ///
    /// The collections are applied only when both read cleanly; on any
    /// parse failure `error` is set and the in-memory state stays exactly
    /// as it was, so a corrupt snapshot can't half-clobber a live session.
    pub fn load(&mut self) {
        let Some(cache) = &self.cache else {
            return;
        };

        self.is_loading = true;

        let tags = cache.try_load::<Vec<Tag>>(TAGS_CACHE_KEY);
        let deals = cache.try_load::<Vec<SavedDeal>>(SAVED_DEALS_CACHE_KEY);

        match (tags, deals) {
            (Ok(tags), Ok(deals)) => {
                if let Some(cached) = tags {
                    self.tags = cached.data;
                }
                if let Some(cached) = deals {
                    self.deals = cached.data;
                }
                self.error = None;
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(error = %e, "failed to load saved deals");
                self.error = Some(format!("Failed to load saved deals: {}", e));
            }
        }

        self.is_loading = false;
    }

    fn persist_tags(&self) {
        if let Some(cache) = &self.cache {
            cache.save(TAGS_CACHE_KEY, &self.tags);
        }
    }

    fn persist_deals(&self) {
        if let Some(cache) = &self.cache {
            cache.save(SAVED_DEALS_CACHE_KEY, &self.deals);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_store() -> (SavedDealsStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        (SavedDealsStore::new(Some(cache)), temp_dir)
    }

    fn sample_deal(title: &str) -> NewSavedDeal {
        NewSavedDeal {
            title: title.to_string(),
            url: format!("https://example.com/{}", title),
            ..NewSavedDeal::default()
        }
    }

    #[test]
    fn test_add_tag_creates_and_persists() {
        let (mut store, temp_dir) = test_store();

        let id = store.add_tag("Hardware").expect("Tag should be added");

        assert_eq!(store.tags().len(), 1);
        assert_eq!(store.tags()[0].id, id);
        assert_eq!(store.tags()[0].name, "Hardware");
        assert!(store.error().is_none());
        assert!(temp_dir
            .path()
            .join(format!("{}.json", TAGS_CACHE_KEY))
            .exists());
    }

    #[test]
    fn test_add_tag_trims_whitespace() {
        let (mut store, _temp_dir) = test_store();

        store.add_tag("  Hardware  ").expect("Tag should be added");

        assert_eq!(store.tags()[0].name, "Hardware");
    }

    #[test]
    fn test_add_tag_rejects_empty_name() {
        let (mut store, _temp_dir) = test_store();

        let result = store.add_tag("   ");

        assert_eq!(result, Err(SavedDealsError::EmptyTagName));
        assert!(store.tags().is_empty());
        assert!(store.error().is_some());
    }

    #[test]
    fn test_add_tag_rejects_case_insensitive_duplicate() {
        let (mut store, _temp_dir) = test_store();

        store.add_tag("Foo").expect("First tag should be added");
        let result = store.add_tag("foo");

        assert_eq!(result, Err(SavedDealsError::DuplicateTagName("foo".to_string())));
        assert_eq!(store.tags().len(), 1, "Duplicate must not be inserted");
        assert_eq!(store.tags()[0].name, "Foo");
        assert!(store.error().is_some());
    }

    #[test]
    fn test_add_tag_clears_previous_error() {
        let (mut store, _temp_dir) = test_store();

        let _ = store.add_tag("");
        assert!(store.error().is_some());

        store.add_tag("Valid").expect("Tag should be added");

        assert!(store.error().is_none());
    }

    #[test]
    fn test_remove_tag_filters_by_id() {
        let (mut store, _temp_dir) = test_store();
        let keep = store.add_tag("Keep").expect("Tag should be added");
        let drop = store.add_tag("Drop").expect("Tag should be added");

        store.remove_tag(drop);

        assert_eq!(store.tags().len(), 1);
        assert_eq!(store.tags()[0].id, keep);
    }

    #[test]
    fn test_clear_tags_empties_collection_and_snapshot() {
        let (mut store, _temp_dir) = test_store();
        store.add_tag("One").expect("Tag should be added");
        store.add_tag("Two").expect("Tag should be added");

        store.clear_tags();

        assert!(store.tags().is_empty());

        let mut reloaded = SavedDealsStore::new(store.cache.clone());
        reloaded.load();
        assert!(reloaded.tags().is_empty());
    }

    #[test]
    fn test_add_deal_inserts_at_the_front() {
        let (mut store, _temp_dir) = test_store();

        store.add_deal(sample_deal("first"));
        let newest = store.add_deal(sample_deal("second"));

        assert_eq!(store.deals().len(), 2);
        assert_eq!(store.deals()[0].id, newest, "New deal must land at index 0");
        assert_eq!(store.deals()[0].title, "second");
        assert_eq!(store.deals()[1].title, "first");
    }

    #[test]
    fn test_add_deal_synthesizes_id_and_timestamp() {
        let (mut store, _temp_dir) = test_store();

        let before = Utc::now();
        let id = store.add_deal(sample_deal("lamp"));
        let after = Utc::now();

        let deal = &store.deals()[0];
        assert_eq!(deal.id, id);
        assert!(deal.found_at >= before && deal.found_at <= after);
    }

    #[test]
    fn test_remove_deal_filters_by_id() {
        let (mut store, _temp_dir) = test_store();
        let first = store.add_deal(sample_deal("first"));
        store.add_deal(sample_deal("second"));

        store.remove_deal(first);

        assert_eq!(store.deals().len(), 1);
        assert_eq!(store.deals()[0].title, "second");
    }

    #[test]
    fn test_every_mutation_keeps_snapshot_in_agreement() {
        let (mut store, _temp_dir) = test_store();
        store.add_tag("Audio").expect("Tag should be added");
        let deal_id = store.add_deal(NewSavedDeal {
            title: "Headphones".to_string(),
            price: Some("89 €".to_string()),
            url: "https://example.com/headphones".to_string(),
            tags: vec!["Audio".to_string()],
            ..NewSavedDeal::default()
        });

        let mut reloaded = SavedDealsStore::new(store.cache.clone());
        reloaded.load();

        assert_eq!(reloaded.tags(), store.tags());
        assert_eq!(reloaded.deals(), store.deals());
        assert_eq!(reloaded.deals()[0].id, deal_id);
        assert!(!reloaded.is_loading());
    }

    #[test]
    fn test_load_with_no_snapshot_leaves_store_empty() {
        let (mut store, _temp_dir) = test_store();

        store.load();

        assert!(store.tags().is_empty());
        assert!(store.deals().is_empty());
        assert!(store.error().is_none());
    }

    #[test]
    fn test_load_with_corrupt_snapshot_sets_error_and_keeps_state() {
        let (mut store, temp_dir) = test_store();
        store.add_tag("Existing").expect("Tag should be added");
        store.add_deal(sample_deal("existing"));
        let tags_before = store.tags().to_vec();
        let deals_before = store.deals().to_vec();

        // Corrupt one of the two snapshots
        fs::write(
            temp_dir.path().join(format!("{}.json", SAVED_DEALS_CACHE_KEY)),
            "not json",
        )
        .expect("Should write file");

        store.load();

        assert!(store.error().is_some());
        assert_eq!(store.tags(), tags_before.as_slice(), "No partial clobber");
        assert_eq!(store.deals(), deals_before.as_slice(), "No partial clobber");
        assert!(!store.is_loading());
    }

    #[test]
    fn test_store_without_cache_still_mutates_in_memory() {
        let mut store = SavedDealsStore::new(None);

        store.add_tag("Volatile").expect("Tag should be added");
        store.add_deal(sample_deal("volatile"));
        store.load();

        assert_eq!(store.tags().len(), 1);
        assert_eq!(store.deals().len(), 1);
    }
}
