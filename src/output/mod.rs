//! Output module for sweep results
//!
//! This module handles:
//! - Writing the per-page result file
//! - Summarizing results by status code

pub mod stats;
mod text;

pub use stats::{print_statistics, summarize, SweepStatistics};
pub use text::{format_result_line, write_results};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
