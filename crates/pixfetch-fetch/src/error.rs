//! Fetch error types.

use pixfetch_types::{BatchError, SessionError};
use thiserror::Error;

/// Errors that can occur while configuring or using a [`Fetcher`](crate::Fetcher).
#[derive(Error, Debug)]
pub enum FetchError {
    /// A fetcher was already configured in this slot.
    #[error("Fetcher can only be configured once")]
    AlreadyConfigured,

    /// An operation was attempted before configuration.
    #[error("Fetcher needs to be configured with a session before use")]
    NotConfigured,

    /// Invalid batch descriptor.
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// Invalid session credential.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status.
    #[error("Server error: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The API answered with its error envelope.
    #[error("API error: {message}")]
    Api {
        /// Message supplied by the API.
        message: String,
    },

    /// Payload did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Requested page does not exist.
    #[error("Work {work_id} has {available} pages, page {page} requested")]
    PageOutOfRange {
        /// The work id.
        work_id: u64,
        /// The requested zero-based page.
        page: usize,
        /// Number of pages the work has.
        available: usize,
    },
}

impl FetchError {
    /// Returns true for failures of a single unit (transport, status, API or
    /// decode) that the streaming operations swallow.
    #[must_use]
    pub const fn is_unit_failure(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::Api { .. } | Self::Decode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_failure_classification() {
        assert!(FetchError::Status { status: 500 }.is_unit_failure());
        assert!(
            FetchError::Api {
                message: "gone".to_string()
            }
            .is_unit_failure()
        );
        assert!(!FetchError::AlreadyConfigured.is_unit_failure());
        assert!(
            !FetchError::from(BatchError::LimitOutOfRange { limit: 0, max: 100 })
                .is_unit_failure()
        );
    }

    #[test]
    fn test_batch_error_is_transparent() {
        let err = FetchError::from(BatchError::LimitOutOfRange {
            limit: 101,
            max: 100,
        });
        assert_eq!(
            err.to_string(),
            "A limit of 101 is not valid (expected 1..=100)"
        );
    }
}
