//! Storage adapter abstraction.
//!
//! All shared mutable state of the gateway lives behind this trait. The
//! coordinator never locks or caches anything itself, so every guarantee
//! about duplicates comes from the atomicity of these operations.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::event::{DedupKey, NewEvent, StoredEvent};

/// Name of the counter incremented once per rejected duplicate.
pub const DUPLICATES_DROPPED: &str = "duplicates_dropped";

/// Counters every backing store must create, at zero, on initialization.
pub const COUNTERS: &[&str] = &[DUPLICATES_DROPPED];

/// Result of a conditional insert.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// No record existed for the key; this record is now stored.
    Inserted(StoredEvent),
    /// A record already existed for the key and was left untouched.
    AlreadyExists,
}

/// Aggregate ledger figures read together in one storage round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerStats {
    /// Records in the ledger.
    pub unique_count: u64,
    /// Value of the `duplicates_dropped` counter.
    pub duplicate_count: u64,
    /// Distinct topics among ledger records.
    pub topic_count: u64,
}

/// Storage contract consumed by the ingestion coordinator.
///
/// Reads are "read committed": they may miss a concurrently committing
/// write but never observe a partial record.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Inserts `event` under `key` if and only if no record with that key
    /// exists. The check and the write are a single atomic step with respect
    /// to every concurrent caller.
    async fn conditional_insert(
        &self,
        key: &DedupKey,
        event: &NewEvent,
    ) -> Result<InsertOutcome, DomainError>;

    /// Atomically adds one to `counter` and returns the new value.
    async fn atomic_increment(&self, counter: &str) -> Result<u64, DomainError>;

    /// Current value of `counter`.
    async fn counter_value(&self, counter: &str) -> Result<u64, DomainError>;

    /// Number of records in the ledger.
    async fn count(&self) -> Result<u64, DomainError>;

    /// Number of distinct topics among ledger records.
    async fn count_distinct_topics(&self) -> Result<u64, DomainError>;

    /// Record count, duplicates counter and distinct topic count taken from
    /// a single read, so the three figures never mix two moments.
    async fn stats_snapshot(&self) -> Result<LedgerStats, DomainError>;

    /// Up to `limit` records, most recently ingested first.
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<StoredEvent>, DomainError>;
}
