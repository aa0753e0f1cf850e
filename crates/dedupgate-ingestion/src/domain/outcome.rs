//! Ingest outcomes.

use dedupgate_core::event::StoredEvent;

/// The two normal results of an ingest. Failures are `DomainError`s.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// First submission for its dedup key; the record is now in the ledger.
    Accepted(StoredEvent),
    /// The dedup key was already present; nothing in the ledger changed.
    Duplicate,
}

impl IngestOutcome {
    /// Returns `true` for [`IngestOutcome::Accepted`].
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}
