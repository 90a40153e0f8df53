//! Crawl orchestration.

use std::time::Instant;

use tracing::debug;

use crate::extractor::extract_results;
use crate::fetcher::{PageFetcher, ProxyFetcher};
use crate::proxy::ProxyPool;
use crate::{CrawlError, Result, SearchQuery, SearchResult};

/// Crawler that fetches search result pages and extracts structured results.
pub struct GitHubCrawler {
    fetcher: Box<dyn PageFetcher>,
}

impl GitHubCrawler {
    /// Creates a crawler that fetches through the given proxy pool.
    pub fn new(pool: ProxyPool) -> Self {
        Self {
            fetcher: Box::new(ProxyFetcher::new(pool)),
        }
    }

    /// Creates a crawler backed by a custom page fetcher.
    pub fn with_fetcher<F: PageFetcher + 'static>(fetcher: F) -> Self {
        Self {
            fetcher: Box::new(fetcher),
        }
    }

    /// Performs a search and returns the extracted results in page order.
    pub async fn search(&self, query: SearchQuery) -> Result<Vec<SearchResult>> {
        if query.keywords.iter().all(|keyword| keyword.trim().is_empty()) {
            return Err(CrawlError::InvalidQuery(
                "Keywords cannot be empty".into(),
            ));
        }

        let start = Instant::now();
        let url = query.search_url();
        debug!("Fetching search page {}", url);

        let html = self.fetcher.fetch(&url).await?;
        let results = extract_results(&html, query.search_type)?;

        debug!(
            "Extracted {} results in {}ms",
            results.len(),
            start.elapsed().as_millis()
        );

        Ok(results)
    }
}
