//! Navigation topology model and remote source
//!
//! Navigation data is a JSON document mapping section names to link lists.
//! Section order in the document is meaningful (it drives tab order and the
//! default selection), so the model preserves it instead of going through a
//! hash map.

use std::fmt;

use reqwest::Client;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A single navigation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationLink {
    /// Display label
    pub label: String,
    /// Target URL
    pub url: String,
}

/// A named group of links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationSection {
    /// Links in document order
    pub links: Vec<NavigationLink>,
}

/// The full navigation topology: sections in document order
///
/// Serializes as a JSON object keyed by section name. Section names are
/// case-sensitive and iteration order matches the source document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationData {
    sections: Vec<(String, NavigationSection)>,
}

impl NavigationData {
    /// Section names in document order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(name, _)| name.as_str())
    }

    /// Looks up a section by its exact name
    pub fn get(&self, name: &str) -> Option<&NavigationSection> {
        self.sections
            .iter()
            .find(|(section_name, _)| section_name == name)
            .map(|(_, section)| section)
    }

    /// Whether a section with this exact name exists
    pub fn contains(&self, name: &str) -> bool {
        self.sections.iter().any(|(section_name, _)| section_name == name)
    }

    /// The first section name in document order
    pub fn first_section(&self) -> Option<&str> {
        self.sections.first().map(|(name, _)| name.as_str())
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the topology has no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl FromIterator<(String, NavigationSection)> for NavigationData {
    fn from_iter<I: IntoIterator<Item = (String, NavigationSection)>>(iter: I) -> Self {
        Self {
            sections: iter.into_iter().collect(),
        }
    }
}

impl Serialize for NavigationData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for (name, section) in &self.sections {
            map.serialize_entry(name, section)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NavigationData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SectionMapVisitor;

        impl<'de> Visitor<'de> for SectionMapVisitor {
            type Value = NavigationData;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of section names to sections")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut sections = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, NavigationSection>()? {
                    sections.push(entry);
                }
                Ok(NavigationData { sections })
            }
        }

        deserializer.deserialize_map(SectionMapVisitor)
    }
}

/// Errors that can occur when fetching navigation data
#[derive(Debug, Error)]
pub enum NavigationError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("failed to fetch navigation data: {0}")]
    Status(reqwest::StatusCode),

    /// The response body was not a valid navigation document
    #[error("failed to parse navigation data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A source of navigation data
///
/// Abstracts the network call so stores can be driven by test doubles.
/// One attempt per invocation; retry policy is the caller's concern.
#[allow(async_fn_in_trait)]
pub trait NavigationSource {
    async fn fetch_navigation(&self) -> Result<NavigationData, NavigationError>;
}

/// Client fetching a navigation JSON document over HTTP
#[derive(Debug, Clone)]
pub struct NavigationClient {
    client: Client,
    url: String,
}

impl NavigationClient {
    /// Creates a new NavigationClient for the given document URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Creates a new NavigationClient with a custom HTTP client
    #[allow(dead_code)]
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl NavigationSource for NavigationClient {
    /// Fetches and parses the navigation document
    ///
    /// # Returns
    /// * `Ok(NavigationData)` - The parsed topology, section order preserved
    /// * `Err(NavigationError)` - On transport failure, non-2xx status, or
    ///   malformed JSON
    async fn fetch_navigation(&self) -> Result<NavigationData, NavigationError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(NavigationError::Status(response.status()));
        }

        let text = response.text().await?;
        let data: NavigationData = serde_json::from_str(&text)?;

        Ok(data)
    }
}
