//! Page fetching through the proxy pool.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Proxy};
use tracing::{debug, warn};

use crate::proxy::{draw_random, ProxyEndpoint, ProxyPool};
use crate::{CrawlError, Result};

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; gh-search/0.1)";

/// Trait for fetching the HTML content of a URL.
///
/// The production implementation routes requests through a proxy pool;
/// tests substitute canned markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the HTML content of the given URL.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches pages through proxies drawn at random from a pool.
///
/// Each fetch consumes its own working copy of the pool: a drawn endpoint
/// is removed from the copy, tried once, and abandoned on failure. The
/// first non-empty response body wins; transport errors and empty bodies
/// move the loop on to the next endpoint until the copy runs out.
pub struct ProxyFetcher {
    pool: ProxyPool,
    timeout: Duration,
    user_agent: String,
}

impl ProxyFetcher {
    /// Creates a fetcher over the given pool with the default timeout.
    pub fn new(pool: ProxyPool) -> Self {
        Self {
            pool,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the User-Agent header sent with each request.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the pool this fetcher draws from.
    pub fn pool(&self) -> &ProxyPool {
        &self.pool
    }

    /// Attempts a single GET through one proxy endpoint.
    ///
    /// The client is built per attempt so each request is routed through
    /// exactly the drawn endpoint. The response status is not inspected:
    /// whatever body the endpoint produces is handed back, and only
    /// transport-level failures surface as errors.
    async fn attempt(
        &self,
        url: &str,
        endpoint: &ProxyEndpoint,
    ) -> std::result::Result<String, reqwest::Error> {
        let proxy = Proxy::all(endpoint.url())?;
        let client = Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .proxy(proxy)
            .build()?;

        let response = client.get(url).send().await?;
        response.text().await
    }
}

#[async_trait]
impl PageFetcher for ProxyFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let mut working = self.pool.working_copy();
        let mut attempts = 0;

        loop {
            let Some(endpoint) = draw_random(&mut working) else {
                return Err(CrawlError::AllProxiesExhausted(attempts));
            };
            attempts += 1;
            debug!(
                "trying proxy {}:{} ({} remaining)",
                endpoint.host,
                endpoint.port,
                working.len()
            );

            match self.attempt(url, &endpoint).await {
                Ok(body) if !body.is_empty() => {
                    debug!(
                        "proxy {}:{} returned {} bytes",
                        endpoint.host,
                        endpoint.port,
                        body.len()
                    );
                    return Ok(body);
                }
                Ok(_) => {
                    warn!("proxy {}:{} returned an empty body", endpoint.host, endpoint.port);
                }
                Err(e) => {
                    warn!("proxy {}:{} failed: {}", endpoint.host, endpoint.port, e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Reserves a port with nothing listening on it.
    fn dead_endpoint() -> ProxyEndpoint {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        ProxyEndpoint::new("127.0.0.1", port)
    }

    fn endpoint_for(server: &MockServer) -> ProxyEndpoint {
        ProxyEndpoint::parse(&server.uri()).unwrap()
    }

    #[test]
    fn test_proxy_fetcher_builders() {
        let fetcher = ProxyFetcher::new(ProxyPool::new())
            .with_timeout(Duration::from_secs(2))
            .with_user_agent("test-agent");
        assert_eq!(fetcher.timeout, Duration::from_secs(2));
        assert_eq!(fetcher.user_agent, "test-agent");
        assert!(fetcher.pool().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_empty_pool_exhausts_without_attempts() {
        let fetcher = ProxyFetcher::new(ProxyPool::new());
        let err = fetcher.fetch("http://github.test/search").await.unwrap_err();
        assert!(matches!(err, CrawlError::AllProxiesExhausted(0)));
    }

    #[tokio::test]
    async fn test_fetch_through_proxy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>results</html>"))
            .mount(&server)
            .await;

        let pool = ProxyPool::with_endpoints(vec![endpoint_for(&server)]);
        let fetcher = ProxyFetcher::new(pool);

        let body = fetcher.fetch("http://github.test/search").await.unwrap();
        assert_eq!(body, "<html>results</html>");
    }

    #[tokio::test]
    async fn test_fetch_retries_after_dead_proxy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let pool = ProxyPool::with_endpoints(vec![dead_endpoint(), endpoint_for(&server)]);
        let fetcher = ProxyFetcher::new(pool);

        let body = fetcher.fetch("http://github.test/search").await.unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_all_proxies_dead() {
        let pool = ProxyPool::with_endpoints(vec![dead_endpoint(), dead_endpoint()]);
        let fetcher = ProxyFetcher::new(pool);

        let err = fetcher.fetch("http://github.test/search").await.unwrap_err();
        assert!(matches!(err, CrawlError::AllProxiesExhausted(2)));
    }

    #[tokio::test]
    async fn test_fetch_empty_body_counts_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let pool = ProxyPool::with_endpoints(vec![endpoint_for(&server)]);
        let fetcher = ProxyFetcher::new(pool);

        let err = fetcher.fetch("http://github.test/search").await.unwrap_err();
        assert!(matches!(err, CrawlError::AllProxiesExhausted(1)));
    }

    #[tokio::test]
    async fn test_fetch_stops_at_first_success() {
        let first = MockServer::start().await;
        let second = MockServer::start().await;
        for server in [&first, &second] {
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_string("<html>hit</html>"))
                .mount(server)
                .await;
        }

        let pool = ProxyPool::with_endpoints(vec![endpoint_for(&first), endpoint_for(&second)]);
        let fetcher = ProxyFetcher::new(pool);

        let body = fetcher.fetch("http://github.test/search").await.unwrap();
        assert_eq!(body, "<html>hit</html>");

        // Whichever endpoint was drawn first answered; the other is never hit.
        let total = first.received_requests().await.unwrap().len()
            + second.received_requests().await.unwrap().len();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_fetch_empty_body_falls_through_to_next_proxy() {
        let empty = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&empty)
            .await;

        let full = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>results</html>"))
            .mount(&full)
            .await;

        let pool = ProxyPool::with_endpoints(vec![endpoint_for(&empty), endpoint_for(&full)]);
        let fetcher = ProxyFetcher::new(pool);

        let body = fetcher.fetch("http://github.test/search").await.unwrap();
        assert_eq!(body, "<html>results</html>");
    }

    #[tokio::test]
    async fn test_fetch_timeout_counts_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html>late</html>")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let pool = ProxyPool::with_endpoints(vec![endpoint_for(&server)]);
        let fetcher = ProxyFetcher::new(pool).with_timeout(Duration::from_millis(50));

        let err = fetcher.fetch("http://github.test/search").await.unwrap_err();
        assert!(matches!(err, CrawlError::AllProxiesExhausted(1)));
    }

    #[tokio::test]
    async fn test_fetch_returns_body_for_error_status() {
        // A non-2xx response still carries a body worth parsing; only
        // transport failures move on to the next endpoint.
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("<html>blocked</html>"))
            .mount(&server)
            .await;

        let pool = ProxyPool::with_endpoints(vec![endpoint_for(&server)]);
        let fetcher = ProxyFetcher::new(pool);

        let body = fetcher.fetch("http://github.test/search").await.unwrap();
        assert_eq!(body, "<html>blocked</html>");
    }
}
