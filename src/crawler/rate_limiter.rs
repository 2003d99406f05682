//! Global request rate limiter
//!
//! A single [`RateLimiter`] instance is shared by every outbound request of a
//! sweep. It admits callers one at a time, at least one interval apart,
//! regardless of how many tasks are waiting.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Admits one request per fixed interval across all callers
///
/// Waiters queue on a fair mutex, so they are released first-in first-out.
/// A caller holds the lock while it sleeps towards its admission instant and
/// only records the admission once it is let through; a caller dropped while
/// waiting leaves no trace. There is no burst allowance: after an idle period
/// the first caller is admitted at once and the next one waits a full
/// interval.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,

    /// Instant of the most recent admission
    last_admission: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter admitting one request per `interval`
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_admission: Mutex::new(None),
        }
    }

    /// The configured spacing between admissions
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until the caller may issue its request
    ///
    /// This never fails; it only delays. Cancel-safe: dropping the returned
    /// future before it completes does not delay later callers.
    pub async fn acquire(&self) {
        let mut last_admission = self.last_admission.lock().await;

        if let Some(last) = *last_admission {
            tokio::time::sleep_until(last + self.interval).await;
        }

        *last_admission = Some(Instant::now());
    }
}
