use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for seo-sweep
///
/// Every section and key is optional in the TOML file; missing values fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Sitemap walk and scrape pool configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum sitemap nesting depth below the seed
    pub max_depth: u32,

    /// Wall-clock budget for the whole sitemap walk (seconds)
    pub walk_budget_secs: u64,

    /// Maximum number of concurrent page fetches in the scrape pool
    pub concurrency: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            walk_budget_secs: 600,
            concurrency: 10,
        }
    }
}

impl CrawlerConfig {
    pub fn walk_budget(&self) -> Duration {
        Duration::from_secs(self.walk_budget_secs)
    }
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Minimum spacing between any two outbound requests (milliseconds)
    pub rate_limit_interval_ms: u64,

    /// Replacement for the built-in User-Agent pool
    pub user_agents: Option<Vec<String>>,

    /// `host:port` dialed by the connectivity pre-check
    pub connectivity_probe: String,

    /// Timeout of the connectivity pre-check (seconds)
    pub connectivity_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            rate_limit_interval_ms: 100,
            user_agents: None,
            connectivity_probe: "google.com:80".to_string(),
            connectivity_timeout_secs: 5,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn rate_limit_interval(&self) -> Duration {
        Duration::from_millis(self.rate_limit_interval_ms)
    }

    pub fn connectivity_timeout(&self) -> Duration {
        Duration::from_secs(self.connectivity_timeout_secs)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the results file
    pub path: String,

    /// Extract title, H1 and meta description for every page
    pub seo: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "Scraped_Site.txt".to_string(),
            seo: false,
        }
    }
}
