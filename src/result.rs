//! Search result types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single GitHub search result.
///
/// `owner` and `language_stats` are populated only for repository
/// results; issue and wiki results carry just the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Absolute URL of the result.
    pub link: String,
    /// Repository owner, derived from the link's first path segment.
    pub owner: Option<String>,
    /// Single-entry map with key `"language"`; the value is the
    /// repository's primary language label when the page shows one.
    pub language_stats: Option<HashMap<String, Option<String>>>,
}

impl SearchResult {
    /// Creates a bare result with only the link set.
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            owner: None,
            language_stats: None,
        }
    }

    /// Sets the repository owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Sets the language stats to a single-entry `{"language": value}` map.
    pub fn with_language(mut self, language: Option<String>) -> Self {
        let mut stats = HashMap::new();
        stats.insert("language".to_string(), language);
        self.language_stats = Some(stats);
        self
    }

    /// Returns the language label for repository results, if any.
    pub fn language(&self) -> Option<&str> {
        self.language_stats.as_ref()?.get("language")?.as_deref()
    }
}
