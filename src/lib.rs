//! # gh-search
//!
//! A GitHub web search crawler that fetches result pages through a pool of
//! rotating proxies and extracts structured results from the page markup.
//!
//! This library scrapes the public search pages rather than the REST API,
//! with support for:
//!
//! - Repository, issue and wiki searches
//! - Random proxy rotation with failover across the pool
//! - Owner and primary-language metadata for repository results
//!
//! ## Example
//!
//! ```rust,no_run
//! use gh_search::{GitHubCrawler, ProxyPool, SearchQuery, SearchType};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = ProxyPool::from_urls(["http://127.0.0.1:8080"])?;
//!     let crawler = GitHubCrawler::new(pool);
//!
//!     let query = SearchQuery::new(["python", "asyncio"])
//!         .with_search_type(SearchType::Repositories);
//!     let results = crawler.search(query).await?;
//!
//!     for result in &results {
//!         println!("{}", result.link);
//!     }
//!     Ok(())
//! }
//! ```

mod crawler;
mod error;
mod extractor;
mod query;
mod result;

pub mod fetcher;
pub mod proxy;

pub use crawler::GitHubCrawler;
pub use error::{CrawlError, Result};
pub use extractor::extract_results;
pub use fetcher::{PageFetcher, ProxyFetcher, DEFAULT_TIMEOUT_SECS};
pub use proxy::{ProxyEndpoint, ProxyPool, ProxyProtocol};
pub use query::{SearchQuery, SearchType};
pub use result::SearchResult;
