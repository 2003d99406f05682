//! seo-sweep: a sitemap-driven page status sweeper
//!
//! This crate walks a site's sitemap hierarchy down to its leaf pages and
//! fetches each one under a global rate limit, recording the HTTP status and,
//! optionally, on-page SEO metadata.

pub mod config;
pub mod crawler;
pub mod output;
pub mod preflight;
pub mod url;

use thiserror::Error;

/// Main error type for seo-sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("No internet connection (probe {probe} failed: {reason})")]
    NoConnectivity { probe: String, reason: String },

    #[error("Seed URL {url} is unreachable: {source}")]
    SeedUnreachable { url: String, source: FetchError },
}

/// Transport-level failure of a single request
///
/// Non-2xx responses are not represented here; the status code travels with
/// the response as data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Transport error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Failed to read response body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

impl FetchError {
    /// The URL the failed request was addressed to
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url } | Self::Transport { url, .. } | Self::Body { url, .. } => url,
        }
    }
}

/// Sitemap body could not be read as markup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Sitemap body is empty")]
    EmptyBody,

    #[error("Sitemap body contains no markup")]
    NotMarkup,

    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("URL is empty")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for seo-sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, PageResult};
pub use crate::url::{normalize_url, validate_seed};
