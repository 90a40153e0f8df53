//! Search query representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CrawlError;

/// Base URL of the GitHub web interface.
pub(crate) const GITHUB_HOST: &str = "https://github.com";

/// The category of GitHub content being searched.
///
/// Determines both the `type` query parameter and which extraction
/// strategy applies to the response markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Repositories,
    Issues,
    Wikis,
}

impl SearchType {
    /// Returns the canonical label used as the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Repositories => "Repositories",
            SearchType::Issues => "Issues",
            SearchType::Wikis => "Wikis",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = CrawlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "repositories" => Ok(SearchType::Repositories),
            "issues" => Ok(SearchType::Issues),
            "wikis" => Ok(SearchType::Wikis),
            other => Err(CrawlError::InvalidQuery(format!(
                "unknown search type: {other}"
            ))),
        }
    }
}

/// A GitHub search query: keywords plus the content category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The search keywords, joined with `+` in the query string.
    pub keywords: Vec<String>,
    /// The content category to search.
    pub search_type: SearchType,
}

impl SearchQuery {
    /// Creates a query for the given keywords, searching repositories.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            search_type: SearchType::default(),
        }
    }

    /// Sets the search type.
    pub fn with_search_type(mut self, search_type: SearchType) -> Self {
        self.search_type = search_type;
        self
    }

    /// Builds the search URL for this query.
    ///
    /// Keywords are percent-encoded individually and joined with `+`;
    /// the search type's canonical label becomes the `type` parameter.
    pub fn search_url(&self) -> String {
        let terms = self
            .keywords
            .iter()
            .map(|keyword| urlencoding::encode(keyword))
            .collect::<Vec<_>>()
            .join("+");

        format!(
            "{GITHUB_HOST}/search?q={terms}&type={}",
            self.search_type.as_str()
        )
    }
}
