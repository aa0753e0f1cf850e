//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// A duplicate submission is deliberately absent: it is a normal ingest
/// outcome, not a failure.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The input was rejected before any storage work happened.
    #[error("validation error: {0}")]
    Validation(String),

    /// The backing store could not be reached or did not answer in time.
    /// The outcome of the operation is unknown and the caller may retry.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The storage contract was broken (missing counter row, an insert
    /// reported for the wrong key, undecodable rows).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    /// Returns `true` when retrying the same operation is safe and may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}
