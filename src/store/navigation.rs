//! Navigation state store
//!
//! Holds the loaded navigation topology and the current section selection,
//! and derives the section list and current-section links for the
//! presentation layer.

use crate::data::{NavigationData, NavigationLink, NavigationSource};

/// State store for the navigation topology
///
/// Constructed with its source injected; callers get a fresh instance per
/// use instead of sharing a process-wide singleton.
#[derive(Debug)]
pub struct NavigationStore<S> {
    source: S,
    navigation: Option<NavigationData>,
    current_section: String,
    is_loading: bool,
    error: Option<String>,
}

impl<S: NavigationSource> NavigationStore<S> {
    /// Creates an empty store backed by the given source
    pub fn new(source: S) -> Self {
        Self {
            source,
            navigation: None,
            current_section: String::new(),
            is_loading: false,
            error: None,
        }
    }

    /// The loaded topology, if any
    pub fn navigation(&self) -> Option<&NavigationData> {
        self.navigation.as_ref()
    }

    /// The currently selected section; empty until one is selected
    pub fn current_section(&self) -> &str {
        &self.current_section
    }

    /// Whether a load is in flight
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The last load failure, if the most recent load failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Section names in document order; empty while nothing is loaded
    pub fn sections(&self) -> Vec<&str> {
        match &self.navigation {
            Some(data) => data.section_names().collect(),
            None => Vec::new(),
        }
    }

    /// Links of the current section
    ///
    /// Empty when nothing is loaded, no section is selected, or the
    /// selected section is absent from the topology.
    pub fn current_links(&self) -> &[NavigationLink] {
        let Some(data) = &self.navigation else {
            return &[];
        };
        if self.current_section.is_empty() {
            return &[];
        }
        data.get(&self.current_section)
            .map(|section| section.links.as_slice())
            .unwrap_or(&[])
    }

    /// Loads the navigation topology from the source
    ///
    /// On success the topology is replaced wholesale and, if no section is
    /// selected yet, the first section in document order is auto-selected.
    /// On failure the previous topology is kept untouched and the failure
    /// reason lands in `error`. The loading flag is cleared on every exit
    /// path.
    pub async fn load_navigation(&mut self) {
        self.is_loading = true;
        self.error = None;

        match self.source.fetch_navigation().await {
            Ok(data) => {
                if self.current_section.is_empty() {
                    if let Some(first) = data.first_section() {
                        self.current_section = first.to_string();
                    }
                }
                self.navigation = Some(data);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load navigation");
                self.error = Some(e.to_string());
            }
        }

        self.is_loading = false;
    }

    /// Selects `section` if it exists in the loaded topology
    ///
    /// Unknown sections are silently ignored; a route can point at a
    /// section before the topology has loaded, and that must not clobber
    /// the selection.
    pub fn set_current_section(&mut self, section: &str) {
        let known = self
            .navigation
            .as_ref()
            .is_some_and(|data| data.contains(section));
        if known {
            self.current_section = section.to_string();
        }
    }
}
