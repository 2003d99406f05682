//! Checks run before a sweep starts
//!
//! A sweep assumes the network is up and the seed answers. These checks turn
//! either assumption failing into a single upfront error instead of a sweep
//! that silently finds nothing.

use crate::crawler::{BodyMode, PageFetcher};
use crate::url::validate_seed;
use crate::SweepError;
use std::time::Duration;
use tokio::net::TcpStream;

/// Verifies outbound connectivity by opening a TCP connection to `probe`
///
/// # Arguments
///
/// * `probe` - A `host:port` address, e.g. `google.com:80`
/// * `timeout` - How long to wait for the connection
pub async fn check_connectivity(probe: &str, timeout: Duration) -> Result<(), SweepError> {
    match tokio::time::timeout(timeout, TcpStream::connect(probe)).await {
        Ok(Ok(_)) => {
            tracing::debug!("Connectivity probe {} succeeded", probe);
            Ok(())
        }
        Ok(Err(e)) => Err(SweepError::NoConnectivity {
            probe: probe.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Err(SweepError::NoConnectivity {
            probe: probe.to_string(),
            reason: format!("timed out after {:?}", timeout),
        }),
    }
}

/// Validates the seed URL and checks that it answers at all
///
/// Any HTTP status counts as reachable; only transport failures are rejected.
///
/// # Returns
///
/// * `Ok(u16)` - The status code the seed answered with
/// * `Err(SweepError)` - The seed is malformed or unreachable
pub async fn check_seed_reachable(fetcher: &dyn PageFetcher, seed: &str) -> Result<u16, SweepError> {
    validate_seed(seed)?;

    let page = fetcher
        .fetch(seed, BodyMode::Skip)
        .await
        .map_err(|source| SweepError::SeedUnreachable {
            url: seed.to_string(),
            source,
        })?;

    tracing::debug!("Seed {} answered HTTP {}", seed, page.status_code);
    Ok(page.status_code)
}
