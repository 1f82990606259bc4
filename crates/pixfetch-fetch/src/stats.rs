//! Counters for admitted requests and swallowed unit failures.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::FetchError;

/// Shared counters of one [`Fetcher`](crate::Fetcher).
///
/// Streaming operations turn a failed unit into an empty result; these
/// counters are how a caller tells "no data" apart from "request failed".
#[derive(Debug, Default)]
pub struct FetchStats {
    admitted: AtomicU64,
    succeeded: AtomicU64,
    transport_failures: AtomicU64,
    api_failures: AtomicU64,
    decode_failures: AtomicU64,
}

/// Point-in-time copy of [`FetchStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Requests admitted through the permit pool.
    pub admitted: u64,
    /// Requests that decoded successfully.
    pub succeeded: u64,
    /// Requests that failed at the HTTP level.
    pub transport_failures: u64,
    /// Requests answered with the API's error envelope.
    pub api_failures: u64,
    /// Requests whose payload did not match the expected shape.
    pub decode_failures: u64,
}

impl StatsSnapshot {
    /// Returns the total number of failed requests.
    #[must_use]
    pub const fn failures(&self) -> u64 {
        self.transport_failures + self.api_failures + self.decode_failures
    }
}

impl FetchStats {
    pub(crate) fn record_admission(&self) {
        self.admitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_success(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self, error: &FetchError) {
        let counter = match error {
            FetchError::Api { .. } => &self.api_failures,
            FetchError::Decode(_) => &self.decode_failures,
            _ => &self.transport_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            admitted: self.admitted.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            api_failures: self.api_failures.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
        }
    }
}
