//! Crawler module for sitemap walking and page fetching
//!
//! This module contains the core sweep pipeline, including:
//! - A global request rate limiter
//! - HTTP fetching with User-Agent rotation
//! - Sitemap `<loc>` extraction and sitemap/page classification
//! - The recursive, deduplicating sitemap walker
//! - The bounded-concurrency scrape pool and its metadata parsers
//! - Overall sweep coordination

mod coordinator;
mod fetcher;
mod metadata;
mod pool;
mod rate_limiter;
mod sitemap;
mod walker;

pub use coordinator::{run_sweep, Coordinator};
pub use fetcher::{
    build_http_client, BodyMode, FetchedPage, Fetcher, PageFetcher, DEFAULT_USER_AGENTS,
};
pub use metadata::{PageMetadata, PageParser, SeoParser, StatusOnlyParser};
pub use pool::{PageResult, ScrapePool, DEFAULT_CONCURRENCY};
pub use rate_limiter::RateLimiter;
pub use sitemap::{classify, extract_locations, is_sitemap_url, Classified};
pub use walker::{
    SitemapWalker, WalkOutcome, WalkStatus, DEFAULT_MAX_DEPTH, DEFAULT_WALK_BUDGET,
};
