//! Bounded-concurrency page scraping
//!
//! Every URL handed to [`ScrapePool::scrape_all`] becomes its own task. A
//! semaphore keeps at most `concurrency` fetches in flight; the global rate
//! limiter inside the fetcher spaces them out further. Page bodies are only
//! downloaded when the parser asks for them. Failed fetches are logged and
//! dropped, so the result list may be shorter than the input.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::metadata::{PageMetadata, PageParser, StatusOnlyParser};
use futures::future::join_all;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Default number of concurrent page fetches
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Outcome of scraping one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// The URL as it was submitted to the pool
    pub url: String,
    pub title: String,
    pub h1: String,
    pub meta_description: String,
    pub status_code: u16,
}

impl PageResult {
    pub fn new(url: String, status_code: u16, metadata: PageMetadata) -> Self {
        Self {
            url,
            title: metadata.title,
            h1: metadata.h1,
            meta_description: metadata.meta_description,
            status_code,
        }
    }
}

/// Fetches a list of pages with a bounded number in flight
pub struct ScrapePool {
    fetcher: Arc<dyn PageFetcher>,
    parser: Arc<dyn PageParser>,
    concurrency: usize,
}

impl ScrapePool {
    /// Creates a status-only pool
    ///
    /// A `concurrency` of 0 is treated as 1.
    pub fn new(fetcher: Arc<dyn PageFetcher>, concurrency: usize) -> Self {
        Self {
            fetcher,
            parser: Arc::new(StatusOnlyParser),
            concurrency: concurrency.max(1),
        }
    }

    /// Replaces the metadata parser
    pub fn with_parser(mut self, parser: Arc<dyn PageParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetches every URL and returns one result per successful fetch
    ///
    /// Returns only after every submitted URL has been processed. Results are
    /// in completion order.
    pub async fn scrape_all(&self, urls: Vec<String>) -> Vec<PageResult> {
        let submitted = urls.len();
        let gate = Arc::new(Semaphore::new(self.concurrency));
        let sink = Arc::new(ResultSink::default());
        let body_mode = self.parser.body_mode();

        let tasks: Vec<_> = urls
            .into_iter()
            .map(|url| {
                let gate = Arc::clone(&gate);
                let fetcher = Arc::clone(&self.fetcher);
                let parser = Arc::clone(&self.parser);
                let sink = Arc::clone(&sink);

                tokio::spawn(async move {
                    let fetched = {
                        let Ok(_permit) = gate.acquire_owned().await else {
                            return;
                        };
                        tracing::debug!("Requesting URL: {}", url);
                        fetcher.fetch(&url, body_mode).await
                    };

                    match fetched {
                        Ok(page) => {
                            let metadata = parser.extract(&page);
                            sink.push(PageResult::new(url, page.status_code, metadata));
                        }
                        Err(e) => {
                            tracing::warn!("Error requesting URL: {}, Error: {}", url, e);
                        }
                    }
                })
            })
            .collect();

        for result in join_all(tasks).await {
            if let Err(e) = result {
                tracing::error!("Scrape task failed: {}", e);
            }
        }

        let results = sink.take();
        tracing::info!("Scraped {} of {} URLs", results.len(), submitted);
        results
    }
}

/// Result accumulator shared by the tasks of one `scrape_all` call
#[derive(Default)]
struct ResultSink {
    results: Mutex<Vec<PageResult>>,
}

impl ResultSink {
    fn push(&self, result: PageResult) {
        self.results
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(result);
    }

    fn take(&self) -> Vec<PageResult> {
        std::mem::take(
            &mut *self
                .results
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}
