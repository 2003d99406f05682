//! Plain-text result file
//!
//! One line per page: `URL: <url>, Status Code: <code>`. With metadata
//! enabled the title, H1 and meta description follow on the same line.

use crate::crawler::PageResult;
use crate::output::OutputResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Formats one result line (without the trailing newline)
///
/// # Example
///
/// ```
/// use seo_sweep::crawler::{PageMetadata, PageResult};
/// use seo_sweep::output::format_result_line;
///
/// let result = PageResult::new("https://example.com/".to_string(), 200, PageMetadata::default());
/// assert_eq!(
///     format_result_line(&result, false),
///     "URL: https://example.com/, Status Code: 200"
/// );
/// ```
pub fn format_result_line(result: &PageResult, include_metadata: bool) -> String {
    let mut line = format!("URL: {}, Status Code: {}", result.url, result.status_code);

    if include_metadata {
        line.push_str(&format!(
            ", Title: {}, H1: {}, Meta Description: {}",
            result.title, result.h1, result.meta_description
        ));
    }

    line
}

/// Writes all results to `path`, replacing any existing file
///
/// Failing to create the file is an error. A line that fails to write is
/// logged and skipped.
///
/// # Returns
///
/// * `Ok(usize)` - Number of lines written
/// * `Err(OutputError)` - The file could not be created or flushed
pub fn write_results(
    path: &Path,
    results: &[PageResult],
    include_metadata: bool,
) -> OutputResult<usize> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut written = 0;

    for result in results {
        match writeln!(writer, "{}", format_result_line(result, include_metadata)) {
            Ok(()) => written += 1,
            Err(e) => tracing::warn!("Failed to write result for {}: {}", result.url, e),
        }
    }

    writer.flush()?;
    Ok(written)
}
