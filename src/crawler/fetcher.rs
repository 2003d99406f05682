//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests of a sweep, including:
//! - Building the shared HTTP client with the configured timeout
//! - Acquiring a rate limiter slot before every request
//! - Rotating the User-Agent header per request
//! - Separating transport failures from HTTP statuses

use crate::config::HttpConfig;
use crate::crawler::rate_limiter::RateLimiter;
use crate::FetchError;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Desktop browser User-Agent strings rotated across requests
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) AppleWebKit/604.1.38 (KHTML, like Gecko) Version/11.0 Safari/604.1.38",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:56.0) Gecko/20100101 Firefox/56.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_13) AppleWebKit/604.1.38 (KHTML, like Gecko) Version/11.0 Safari/604.1.38",
];

/// Whether a fetch downloads the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// Read the whole body into [`FetchedPage::body`]
    Read,
    /// Stop after the status line and headers; the body is left empty
    Skip,
}

/// A response that made it back over the wire
///
/// Any HTTP status counts, including 4xx and 5xx.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: String,
    /// URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Response body, empty when fetched with [`BodyMode::Skip`]
    pub body: String,
}

/// Something that can retrieve a URL
///
/// The walker and the scrape pool only depend on this trait, so tests can
/// drive them with in-memory doubles. Waiting for a request slot and sending
/// the request are separate steps so that a caller can give up while it is
/// still queued without abandoning a request already on the wire.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Waits until this fetcher may issue its next request
    ///
    /// Must be cancel-safe. The default admits immediately.
    async fn wait_for_slot(&self) {}

    /// Sends the request for `url` without waiting for a slot
    async fn send(&self, url: &str, body: BodyMode) -> Result<FetchedPage, FetchError>;

    /// Waits for a slot, then fetches `url`
    ///
    /// Returns the response or a transport-level error.
    async fn fetch(&self, url: &str, body: BodyMode) -> Result<FetchedPage, FetchError> {
        self.wait_for_slot().await;
        self.send(url, body).await
    }
}

/// Builds an HTTP client with the given request timeout
///
/// No default User-Agent is set; [`Fetcher`] picks one per request.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Rate-limited HTTP fetcher with User-Agent rotation
pub struct Fetcher {
    client: Client,
    limiter: Arc<RateLimiter>,
    user_agents: Vec<String>,
}

impl Fetcher {
    /// Creates a fetcher from its parts
    ///
    /// An empty `user_agents` list falls back to [`DEFAULT_USER_AGENTS`].
    pub fn new(client: Client, limiter: Arc<RateLimiter>, user_agents: Vec<String>) -> Self {
        let user_agents = if user_agents.is_empty() {
            DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect()
        } else {
            user_agents
        };

        Self {
            client,
            limiter,
            user_agents,
        }
    }

    /// Creates a fetcher from the HTTP configuration section
    ///
    /// # Example
    ///
    /// ```no_run
    /// use seo_sweep::config::HttpConfig;
    /// use seo_sweep::crawler::{Fetcher, RateLimiter};
    /// use std::sync::Arc;
    ///
    /// let config = HttpConfig::default();
    /// let limiter = Arc::new(RateLimiter::new(config.rate_limit_interval()));
    /// let fetcher = Fetcher::from_config(&config, limiter).unwrap();
    /// ```
    pub fn from_config(config: &HttpConfig, limiter: Arc<RateLimiter>) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config.timeout())?;
        let user_agents = config.user_agents.clone().unwrap_or_default();
        Ok(Self::new(client, limiter, user_agents))
    }

    /// Picks a User-Agent uniformly at random from the pool
    pub fn pick_user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(DEFAULT_USER_AGENTS[0])
    }
}

#[async_trait]
impl PageFetcher for Fetcher {
    async fn wait_for_slot(&self) {
        self.limiter.acquire().await;
    }

    async fn send(&self, url: &str, body: BodyMode) -> Result<FetchedPage, FetchError> {
        let user_agent = self.pick_user_agent().to_string();
        tracing::trace!("GET {} as {}", url, user_agent);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();

        let body = match body {
            BodyMode::Skip => String::new(),
            BodyMode::Read => response.text().await.map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::Body {
                        url: url.to_string(),
                        source: e,
                    }
                }
            })?,
        };

        Ok(FetchedPage {
            url: url.to_string(),
            final_url,
            status_code,
            body,
        })
    }
}

/// Maps a request error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_fetcher(timeout: Duration, interval: Duration, user_agents: Vec<String>) -> Fetcher {
        let client = build_http_client(timeout).unwrap();
        Fetcher::new(client, Arc::new(RateLimiter::new(interval)), user_agents)
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(Duration::from_secs(30)).is_ok());
    }

    #[test]
    fn test_empty_pool_falls_back_to_defaults() {
        let fetcher = test_fetcher(Duration::from_secs(1), Duration::from_millis(1), vec![]);
        assert_eq!(fetcher.user_agents.len(), DEFAULT_USER_AGENTS.len());
    }

    #[test]
    fn test_user_agent_rotation() {
        let fetcher = test_fetcher(Duration::from_secs(1), Duration::from_millis(1), vec![]);

        let picked: HashSet<&str> = (0..200).map(|_| fetcher.pick_user_agent()).collect();

        assert!(picked.iter().all(|ua| DEFAULT_USER_AGENTS.contains(ua)));
        assert!(picked.len() > 1, "User-Agent never rotated");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<urlset></urlset>"))
            .mount(&server)
            .await;

        let fetcher = test_fetcher(Duration::from_secs(5), Duration::from_millis(1), vec![]);
        let url = format!("{}/sitemap.xml", server.uri());
        let page = fetcher.fetch(&url, BodyMode::Read).await.unwrap();

        assert_eq!(page.status_code, 200);
        assert_eq!(page.url, url);
        assert_eq!(page.final_url, url);
        assert_eq!(page.body, "<urlset></urlset>");
    }

    #[tokio::test]
    async fn test_error_status_is_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = test_fetcher(Duration::from_secs(5), Duration::from_millis(1), vec![]);

        let missing = fetcher
            .fetch(&format!("{}/missing", server.uri()), BodyMode::Read)
            .await
            .unwrap();
        assert_eq!(missing.status_code, 404);

        let broken = fetcher
            .fetch(&format!("{}/broken", server.uri()), BodyMode::Read)
            .await
            .unwrap();
        assert_eq!(broken.status_code, 503);
    }

    #[tokio::test]
    async fn test_user_agent_header_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "SweepTest/1.0"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = test_fetcher(
            Duration::from_secs(5),
            Duration::from_millis(1),
            vec!["SweepTest/1.0".to_string()],
        );
        let page = fetcher.fetch(&server.uri(), BodyMode::Read).await.unwrap();

        assert_eq!(page.status_code, 200);
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let fetcher = test_fetcher(Duration::from_millis(200), Duration::from_millis(1), vec![]);
        let result = fetcher.fetch(&server.uri(), BodyMode::Read).await;

        assert!(matches!(result, Err(FetchError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let fetcher = test_fetcher(Duration::from_secs(5), Duration::from_millis(1), vec![]);
        let url = format!("http://127.0.0.1:{}/", port);
        let err = fetcher.fetch(&url, BodyMode::Read).await.unwrap_err();

        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.url(), url);
    }

    #[tokio::test]
    async fn test_invalid_url_is_transport_error() {
        let fetcher = test_fetcher(Duration::from_secs(5), Duration::from_millis(1), vec![]);
        let result = fetcher.fetch("not a url", BodyMode::Read).await;
        assert!(matches!(result, Err(FetchError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_each_fetch_consumes_a_rate_slot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let fetcher = test_fetcher(Duration::from_secs(5), Duration::from_millis(150), vec![]);
        let start = Instant::now();

        for _ in 0..3 {
            fetcher.fetch(&server.uri(), BodyMode::Read).await.unwrap();
        }

        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    /// Serves one response whose headers arrive at once but whose body stalls
    async fn stalled_body_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100000\r\n\r\n<html>")
                .await;
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        format!("http://{}/big-page", addr)
    }

    #[tokio::test]
    async fn test_skip_body_keeps_status_of_stalled_page() {
        let url = stalled_body_server().await;
        let fetcher = test_fetcher(Duration::from_millis(500), Duration::from_millis(1), vec![]);

        let page = fetcher.fetch(&url, BodyMode::Skip).await.unwrap();

        assert_eq!(page.status_code, 200);
        assert!(page.body.is_empty());
    }

    #[tokio::test]
    async fn test_read_body_of_stalled_page_times_out() {
        let url = stalled_body_server().await;
        let fetcher = test_fetcher(Duration::from_millis(500), Duration::from_millis(1), vec![]);

        let result = fetcher.fetch(&url, BodyMode::Read).await;

        assert!(matches!(result, Err(FetchError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_send_skips_the_rate_slot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let fetcher = test_fetcher(Duration::from_secs(5), Duration::from_secs(60), vec![]);
        fetcher.wait_for_slot().await;
        let start = Instant::now();

        let page = fetcher.send(&server.uri(), BodyMode::Skip).await.unwrap();

        assert_eq!(page.status_code, 200);
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
