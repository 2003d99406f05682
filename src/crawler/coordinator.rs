//! Sweep coordinator
//!
//! Composes the sitemap walker and the scrape pool. The coordinator owns the
//! one rate limiter and fetcher of a sweep, so sitemap and page requests share
//! the same admission clock.

use crate::config::{validate_config, Config};
use crate::crawler::fetcher::{Fetcher, PageFetcher};
use crate::crawler::metadata::{PageParser, SeoParser, StatusOnlyParser};
use crate::crawler::pool::{PageResult, ScrapePool};
use crate::crawler::rate_limiter::RateLimiter;
use crate::crawler::walker::SitemapWalker;
use crate::SweepError;
use std::sync::Arc;

/// Runs one sweep: sitemap walk, then page scrape
pub struct Coordinator {
    config: Config,
    fetcher: Arc<dyn PageFetcher>,
    parser: Arc<dyn PageParser>,
}

impl Coordinator {
    /// Creates a coordinator with an HTTP fetcher built from `config`
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(SweepError)` - The configuration is invalid or the HTTP client
    ///   could not be built
    pub fn new(config: Config) -> Result<Self, SweepError> {
        validate_config(&config)?;
        let limiter = Arc::new(RateLimiter::new(config.http.rate_limit_interval()));
        let fetcher = Fetcher::from_config(&config.http, limiter)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Creates a coordinator around an existing fetcher
    ///
    /// The parser follows `config.output.seo`.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        let parser: Arc<dyn PageParser> = if config.output.seo {
            Arc::new(SeoParser)
        } else {
            Arc::new(StatusOnlyParser)
        };

        Self {
            config,
            fetcher,
            parser,
        }
    }

    /// Replaces the page metadata parser
    pub fn with_parser(mut self, parser: Arc<dyn PageParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The shared fetcher, for requests made outside the sweep itself
    pub fn fetcher(&self) -> Arc<dyn PageFetcher> {
        Arc::clone(&self.fetcher)
    }

    /// Walks the sitemaps under `seed` and scrapes every page found
    pub async fn run(&self, seed: &str) -> Vec<PageResult> {
        tracing::info!("Extracting sitemap URLs...");
        let pages = SitemapWalker::new(self.fetcher())
            .with_max_depth(self.config.crawler.max_depth)
            .with_budget(self.config.crawler.walk_budget())
            .walk(seed)
            .await;

        if pages.is_empty() {
            tracing::info!("No URLs extracted from sitemap");
            return Vec::new();
        }

        tracing::info!("Scraping {} URLs...", pages.len());
        ScrapePool::new(self.fetcher(), self.config.crawler.concurrency)
            .with_parser(Arc::clone(&self.parser))
            .scrape_all(pages)
            .await
    }
}

/// Runs a complete sweep with a freshly built coordinator
///
/// # Example
///
/// ```no_run
/// use seo_sweep::config::Config;
/// use seo_sweep::crawler::run_sweep;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let results = run_sweep(Config::default(), "https://example.com/sitemap.xml").await?;
/// for result in results {
///     println!("{} {}", result.status_code, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn run_sweep(config: Config, seed: &str) -> Result<Vec<PageResult>, SweepError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run(seed).await)
}
