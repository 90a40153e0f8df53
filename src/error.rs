//! Error types for the crawler library.

use thiserror::Error;

/// Result type alias for crawl operations.
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Errors that can occur while searching GitHub.
///
/// Per-proxy transport failures are not represented here: the fetcher
/// swallows them and retries with the next endpoint, so callers only ever
/// see the terminal [`CrawlError::AllProxiesExhausted`].
#[derive(Error, Debug)]
pub enum CrawlError {
    /// Every proxy in the pool was tried without a usable response.
    #[error("Proxy pool exhausted after {0} failed attempts")]
    AllProxiesExhausted(usize),

    /// Failed to parse the response markup.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid query.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Proxy endpoint URI could not be parsed.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Proxy endpoint URI parsed but is not usable as a proxy.
    #[error("Invalid proxy endpoint: {0}")]
    InvalidProxy(String),
}
