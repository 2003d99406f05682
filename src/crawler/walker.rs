//! Recursive sitemap walker
//!
//! Starting from a seed sitemap, the walker fetches every nested sitemap it can
//! reach and collects the leaf page URLs they list. Nested sitemaps are visited
//! concurrently, each as its own task, and a node only finishes once its whole
//! subtree has. The walk is bounded three ways:
//!
//! - depth: nodes deeper than `max_depth` below the seed are not fetched
//! - deduplication: each distinct URL is fetched at most once per walk
//! - wall clock: once the budget expires the pages gathered so far are returned
//!
//! After the budget expires the walk's frontier is sealed. Visits still queued
//! for a request slot give up without sending anything. Requests already on
//! the wire are left to finish, but whatever they find is discarded and they
//! start no further fetches.

use crate::crawler::fetcher::{BodyMode, PageFetcher};
use crate::crawler::sitemap::{classify, extract_locations, Classified};
use crate::url::visit_key;
use futures::future::{join_all, BoxFuture};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;

/// Default maximum sitemap nesting depth
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Default wall-clock budget of one walk
pub const DEFAULT_WALK_BUDGET: Duration = Duration::from_secs(10 * 60);

/// How a walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    /// Every reachable node was processed
    Completed,
    /// The wall-clock budget expired first; the pages are partial
    TimedOut,
}

/// Result of one walk
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    /// Leaf page URLs, in the order they were discovered
    pub pages: Vec<String>,
    pub status: WalkStatus,
    /// Number of distinct sitemap URLs claimed for fetching
    pub sitemaps_visited: usize,
}

/// Walks a sitemap hierarchy down to its leaf pages
pub struct SitemapWalker {
    fetcher: Arc<dyn PageFetcher>,
    max_depth: u32,
    budget: Duration,
}

impl SitemapWalker {
    /// Creates a walker with the default depth and budget
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            max_depth: DEFAULT_MAX_DEPTH,
            budget: DEFAULT_WALK_BUDGET,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Resolves `seed` to the page URLs listed beneath it
    ///
    /// Never fails: unreachable or malformed nodes contribute nothing, and an
    /// expired budget yields the pages gathered so far.
    pub async fn walk(&self, seed: &str) -> Vec<String> {
        self.walk_with_status(seed).await.pages
    }

    /// Like [`SitemapWalker::walk`], also reporting how the walk ended
    pub async fn walk_with_status(&self, seed: &str) -> WalkOutcome {
        let context = Arc::new(WalkContext {
            fetcher: Arc::clone(&self.fetcher),
            max_depth: self.max_depth,
            frontier: WalkFrontier::default(),
        });

        tracing::info!(
            "Walking sitemaps from {} (max depth {}, budget {:?})",
            seed,
            self.max_depth,
            self.budget
        );

        let root = tokio::spawn(visit(Arc::clone(&context), seed.to_string(), 0));

        let status = match tokio::time::timeout(self.budget, root).await {
            Ok(Ok(())) => {
                tracing::info!("Sitemap extraction completed");
                WalkStatus::Completed
            }
            Ok(Err(e)) => {
                tracing::error!("Sitemap walk task failed: {}", e);
                WalkStatus::Completed
            }
            Err(_) => {
                tracing::warn!("Sitemap extraction timed out after {:?}", self.budget);
                WalkStatus::TimedOut
            }
        };

        let (pages, sitemaps_visited) = context.frontier.seal();
        tracing::info!(
            "Extracted {} page URLs from {} sitemaps",
            pages.len(),
            sitemaps_visited
        );

        WalkOutcome {
            pages,
            status,
            sitemaps_visited,
        }
    }
}

/// Everything a visit task needs, shared by all tasks of one walk
struct WalkContext {
    fetcher: Arc<dyn PageFetcher>,
    max_depth: u32,
    frontier: WalkFrontier,
}

/// Visited set and page accumulator of one walk, behind a single lock
///
/// Sealing also notifies every visit waiting for a request slot.
struct WalkFrontier {
    state: Mutex<FrontierState>,
    sealed_tx: watch::Sender<bool>,
}

impl Default for WalkFrontier {
    fn default() -> Self {
        let (sealed_tx, _) = watch::channel(false);
        Self {
            state: Mutex::new(FrontierState::default()),
            sealed_tx,
        }
    }
}

#[derive(Default)]
struct FrontierState {
    visited: HashSet<String>,
    pages: Vec<String>,
    sealed: bool,
}

impl WalkFrontier {
    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claims a URL key for fetching
    ///
    /// Returns false if the key was claimed before or the walk is sealed.
    fn claim(&self, key: String) -> bool {
        let mut state = self.lock();
        !state.sealed && state.visited.insert(key)
    }

    /// Appends discovered pages; returns false (dropping them) once sealed
    fn record_pages(&self, pages: Vec<String>) -> bool {
        let mut state = self.lock();
        if state.sealed {
            return false;
        }
        state.pages.extend(pages);
        true
    }

    /// Closes the frontier to further writes and takes the pages gathered
    fn seal(&self) -> (Vec<String>, usize) {
        let mut state = self.lock();
        state.sealed = true;
        self.sealed_tx.send_replace(true);
        (std::mem::take(&mut state.pages), state.visited.len())
    }

    /// Resolves once the frontier is sealed
    fn sealed(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut sealed_rx = self.sealed_tx.subscribe();
        async move {
            let sender_gone = sealed_rx.wait_for(|sealed| *sealed).await.is_err();
            if sender_gone {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Processes one sitemap node and, concurrently, its nested sitemaps
fn visit(context: Arc<WalkContext>, url: String, depth: u32) -> BoxFuture<'static, ()> {
    Box::pin(async move {
        if depth > context.max_depth {
            tracing::debug!("Max depth reached for URL: {}", url);
            return;
        }

        if !context.frontier.claim(visit_key(&url)) {
            return;
        }

        tracing::debug!("Processing sitemap (depth {}): {}", depth, url);

        tokio::select! {
            biased;
            _ = context.frontier.sealed() => {
                tracing::debug!("Walk finished before {} got a request slot", url);
                return;
            }
            _ = context.fetcher.wait_for_slot() => {}
        }

        let page = match context.fetcher.send(&url, BodyMode::Read).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Error retrieving sitemap {}: {}", url, e);
                return;
            }
        };

        if !(200..300).contains(&page.status_code) {
            tracing::debug!("Sitemap {} answered HTTP {}", url, page.status_code);
        }

        let locations = match extract_locations(&page.body) {
            Ok(locations) => locations,
            Err(e) => {
                tracing::warn!("Error extracting URLs from sitemap {}: {}", url, e);
                return;
            }
        };

        let Classified { sitemaps, pages } = classify(locations);
        tracing::debug!(
            "Sitemap {} lists {} sitemaps and {} pages",
            url,
            sitemaps.len(),
            pages.len()
        );

        if !context.frontier.record_pages(pages) {
            tracing::debug!("Walk already finished, dropping results of {}", url);
            return;
        }

        let children = sitemaps.into_iter().map(|sitemap_url| {
            tracing::debug!("Found sitemap {}", sitemap_url);
            tokio::spawn(visit(Arc::clone(&context), sitemap_url, depth + 1))
        });

        for result in join_all(children).await {
            if let Err(e) = result {
                tracing::error!("Sitemap task under {} failed: {}", url, e);
            }
        }
    })
}
