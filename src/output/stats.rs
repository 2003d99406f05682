//! Sweep statistics
//!
//! Summarizes a result set by status code for the end-of-run report.

use crate::crawler::PageResult;
use std::collections::BTreeMap;

/// Status breakdown of a sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepStatistics {
    /// Number of pages fetched
    pub total_pages: usize,

    /// Count of pages per HTTP status code
    pub pages_by_status: BTreeMap<u16, usize>,
}

impl SweepStatistics {
    /// Pages that answered with a 2xx status
    pub fn successful(&self) -> usize {
        self.pages_by_status
            .range(200..300)
            .map(|(_, count)| count)
            .sum()
    }

    /// Pages that answered with a 4xx or 5xx status
    pub fn errors(&self) -> usize {
        self.pages_by_status
            .range(400..600)
            .map(|(_, count)| count)
            .sum()
    }
}

/// Builds statistics from a result set
pub fn summarize(results: &[PageResult]) -> SweepStatistics {
    let mut pages_by_status = BTreeMap::new();
    for result in results {
        *pages_by_status.entry(result.status_code).or_insert(0) += 1;
    }

    SweepStatistics {
        total_pages: results.len(),
        pages_by_status,
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &SweepStatistics) {
    println!("=== Sweep Statistics ===\n");
    println!("Total pages: {}", stats.total_pages);
    println!("  2xx: {}", stats.successful());
    println!("  4xx/5xx: {}", stats.errors());

    if !stats.pages_by_status.is_empty() {
        println!("\nPages by status code:");
        for (status, count) in &stats.pages_by_status {
            println!("  {}: {}", status, count);
        }
    }
}
