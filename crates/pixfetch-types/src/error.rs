//! Error types for pixfetch domain values.

use thiserror::Error;

/// Error for invalid batch descriptors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchError {
    /// Requested limit is zero or larger than the listing page size.
    #[error("A limit of {limit} is not valid (expected 1..={max})")]
    LimitOutOfRange {
        /// The rejected limit.
        limit: u32,
        /// The largest limit the listing accepts.
        max: u32,
    },
}

/// Error for malformed session credentials.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The credential was empty.
    #[error("Session credential is empty")]
    Empty,

    /// The credential does not start with a numeric user id.
    #[error("Session credential has no numeric user id prefix: {prefix:?}")]
    MissingUserId {
        /// The text found before the first `_`.
        prefix: String,
    },

    /// The credential contains whitespace, control or non-ASCII characters.
    #[error("Session credential contains characters not allowed in a cookie")]
    InvalidCharacter,
}
