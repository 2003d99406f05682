use crate::UrlError;
use url::Url;

/// Normalizes a URL into the form used for visited-set keys
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. Parse the URL; reject if malformed
/// 3. Require an HTTP or HTTPS scheme and a host
/// 4. Lowercase scheme and host, drop default ports and dot segments
///    (performed by the `url` parser)
/// 5. Remove the fragment (everything after #)
/// 6. Remove an empty query string (trailing ?)
///
/// Unlike link-graph normalization, the path and query are otherwise kept
/// verbatim: two sitemap files that differ only in a trailing slash or a query
/// parameter are distinct resources.
///
/// # Examples
///
/// ```
/// use seo_sweep::url::normalize_url;
///
/// let url = normalize_url("  HTTPS://Example.COM:443/sitemap.xml#top ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/sitemap.xml");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let trimmed = url_str.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut url = Url::parse(trimmed).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}

/// Returns the visited-set key for a URL listed in a sitemap
///
/// Falls back to the trimmed input when the URL does not normalize, so that
/// unparseable entries are still deduplicated by their literal text.
pub fn visit_key(url_str: &str) -> String {
    match normalize_url(url_str) {
        Ok(url) => url.into(),
        Err(_) => url_str.trim().to_string(),
    }
}
