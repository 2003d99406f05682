//! URL handling module for seo-sweep
//!
//! This module provides the normalization used for visited-set keys and the
//! syntactic validation of the seed URL.

mod normalize;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use normalize::{normalize_url, visit_key};

/// Validates a seed URL before any request is made
///
/// The seed must be non-empty, parse as an absolute URL, use the HTTP or
/// HTTPS scheme and carry a host. Reachability is checked separately by
/// [`crate::preflight::check_seed_reachable`].
///
/// # Examples
///
/// ```
/// use seo_sweep::url::validate_seed;
///
/// assert!(validate_seed("https://example.com/sitemap.xml").is_ok());
/// assert!(validate_seed("").is_err());
/// ```
pub fn validate_seed(seed: &str) -> Result<Url, UrlError> {
    normalize_url(seed)
}
