//! On-page metadata extraction
//!
//! The scrape pool hands every fetched page to a [`PageParser`]. The default
//! [`StatusOnlyParser`] records nothing beyond the status code; [`SeoParser`]
//! pulls the title, the first H1 and the meta description out of the HTML.

use crate::crawler::fetcher::{BodyMode, FetchedPage};
use scraper::{Html, Selector};

/// SEO fields extracted from a page body
///
/// Fields that were not extracted or not present are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub h1: String,
    pub meta_description: String,
}

/// Extracts metadata from a fetched page
pub trait PageParser: Send + Sync {
    /// Whether pages must be fetched with their body for [`PageParser::extract`]
    fn body_mode(&self) -> BodyMode {
        BodyMode::Read
    }

    fn extract(&self, page: &FetchedPage) -> PageMetadata;
}

/// Captures the status code only
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusOnlyParser;

impl PageParser for StatusOnlyParser {
    fn body_mode(&self) -> BodyMode {
        BodyMode::Skip
    }

    fn extract(&self, _page: &FetchedPage) -> PageMetadata {
        PageMetadata::default()
    }
}

/// Extracts title, first H1 and meta description from HTML
#[derive(Debug, Clone, Copy, Default)]
pub struct SeoParser;

impl PageParser for SeoParser {
    fn extract(&self, page: &FetchedPage) -> PageMetadata {
        let document = Html::parse_document(&page.body);

        PageMetadata {
            title: first_text(&document, "title"),
            h1: first_text(&document, "h1"),
            meta_description: first_attr(&document, "meta[name^=description]", "content"),
        }
    }
}

/// Trimmed text of the first element matching `selector`
fn first_text(document: &Html, selector: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Trimmed `attr` value of the first element matching `selector`
fn first_attr(document: &Html, selector: &str, attr: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}
