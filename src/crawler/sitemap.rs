//! Sitemap extraction
//!
//! This module turns a sitemap or sitemap-index body into the URLs it lists,
//! and splits those URLs into nested sitemaps and leaf pages.
//!
//! Bodies are parsed with the tolerant HTML parser from `scraper`, so
//! sitemaps with stray markup, missing namespaces or HTML wrappers still yield
//! their `<loc>` entries.

use crate::ParseError;
use scraper::{Html, Selector};

/// URLs listed by one sitemap node, split by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    /// URLs that look like further sitemap files
    pub sitemaps: Vec<String>,
    /// Leaf page URLs
    pub pages: Vec<String>,
}

/// Extracts the text of every `<loc>` element, in document order
///
/// Entries are trimmed; blank entries are skipped.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The listed locations (possibly none)
/// * `Err(ParseError)` - The body is empty or contains no markup
///
/// # Example
///
/// ```
/// use seo_sweep::crawler::extract_locations;
///
/// let xml = r#"<urlset><url><loc>https://example.com/</loc></url></urlset>"#;
/// assert_eq!(extract_locations(xml).unwrap(), vec!["https://example.com/"]);
/// ```
pub fn extract_locations(body: &str) -> Result<Vec<String>, ParseError> {
    if body.trim().is_empty() {
        return Err(ParseError::EmptyBody);
    }

    if !body.contains('<') {
        return Err(ParseError::NotMarkup);
    }

    let loc_selector =
        Selector::parse("loc").map_err(|e| ParseError::Selector(e.to_string()))?;

    let document = Html::parse_document(body);

    let locations = document
        .select(&loc_selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect();

    Ok(locations)
}

/// Returns true if a listed URL refers to another sitemap file
///
/// The test is a case-sensitive substring match on `"xml"`, which also catches
/// compressed sitemaps such as `sitemap.xml.gz`.
pub fn is_sitemap_url(url: &str) -> bool {
    url.contains("xml")
}

/// Splits listed URLs into sitemap references and page URLs
///
/// Order is preserved within each group and duplicates are kept.
///
/// # Example
///
/// ```
/// use seo_sweep::crawler::classify;
///
/// let urls = vec!["a.xml".to_string(), "b.html".to_string()];
/// let classified = classify(urls);
/// assert_eq!(classified.sitemaps, vec!["a.xml"]);
/// assert_eq!(classified.pages, vec!["b.html"]);
/// ```
pub fn classify(urls: Vec<String>) -> Classified {
    let (sitemaps, pages) = urls.into_iter().partition(|url| is_sitemap_url(url));
    Classified { sitemaps, pages }
}
