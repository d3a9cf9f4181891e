//! Models for locally saved deals and their tags
//!
//! Unlike the remote collection, these records are created by the user and
//! never leave the machine; ids are generated locally and the persisted
//! wire format uses camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined tag for categorizing saved deals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    /// Case-insensitively unique within the tag collection
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A deal the user saved by hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDeal {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub original_price: Option<String>,
    #[serde(default)]
    pub discount: Option<String>,
    pub url: String,
    /// Tag references by name
    #[serde(default)]
    pub tags: Vec<String>,
    /// When the deal was saved; immutable once set
    pub found_at: DateTime<Utc>,
}

/// Input for saving a new deal; `id` and `found_at` are synthesized by the
/// store
#[derive(Debug, Clone, Default)]
pub struct NewSavedDeal {
    pub title: String,
    pub description: Option<String>,
    pub price: Option<String>,
    pub original_price: Option<String>,
    pub discount: Option<String>,
    pub url: String,
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_deal_uses_camel_case_wire_names() {
        let deal = SavedDeal {
            id: Uuid::new_v4(),
            title: "Standing desk".to_string(),
            description: None,
            price: Some("299 €".to_string()),
            original_price: Some("449 €".to_string()),
            discount: Some("-33%".to_string()),
            url: "https://example.com/desk".to_string(),
            tags: vec!["office".to_string()],
            found_at: Utc::now(),
        };

        let json = serde_json::to_string(&deal).expect("Should serialize");

        assert!(json.contains("\"originalPrice\""));
        assert!(json.contains("\"foundAt\""));
        assert!(!json.contains("\"original_price\""));
    }

    #[test]
    fn test_saved_deal_tolerates_missing_optional_fields() {
        let json = format!(
            r#"{{"id": "{}", "title": "Lamp", "url": "https://example.com/lamp", "foundAt": "2024-11-20T08:00:00Z"}}"#,
            Uuid::new_v4()
        );

        let deal: SavedDeal = serde_json::from_str(&json).expect("Should parse");

        assert!(deal.description.is_none());
        assert!(deal.tags.is_empty());
    }

    #[test]
    fn test_tag_roundtrip() {
        let tag = Tag {
            id: Uuid::new_v4(),
            name: "Möbel".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&tag).expect("Should serialize");
        let parsed: Tag = serde_json::from_str(&json).expect("Should parse");

        assert_eq!(parsed, tag);
        assert!(json.contains("\"createdAt\""));
    }
}
