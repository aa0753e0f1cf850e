//! Test storage adapters — mock `StorageAdapter` implementations for tests.

use async_trait::async_trait;
use dedupgate_core::error::DomainError;
use dedupgate_core::event::{DedupKey, NewEvent, StoredEvent};
use dedupgate_core::storage::{InsertOutcome, LedgerStats, StorageAdapter};
use parking_lot::Mutex;

/// A call observed by [`RecordingStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
    /// `conditional_insert` for the given key.
    ConditionalInsert(DedupKey),
    /// `atomic_increment` of the given counter.
    AtomicIncrement(String),
    /// `fetch_recent` with the given limit.
    FetchRecent(usize),
    /// Any other read-side query.
    Read(&'static str),
}

/// A storage adapter that answers every conditional insert with a scripted
/// outcome and records the calls it receives. Reads return empty results.
#[derive(Debug)]
pub struct RecordingStorage {
    insert_outcome: InsertOutcome,
    fail_increment: bool,
    calls: Mutex<Vec<StorageCall>>,
}

impl RecordingStorage {
    /// Every conditional insert returns `insert_outcome`.
    #[must_use]
    pub fn new(insert_outcome: InsertOutcome) -> Self {
        Self {
            insert_outcome,
            fail_increment: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reports every insert as a conflict and fails every counter increment
    /// with a storage outage.
    #[must_use]
    pub fn conflicting_with_failing_counter() -> Self {
        Self {
            insert_outcome: InsertOutcome::AlreadyExists,
            fail_increment: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all calls made so far, in order.
    pub fn calls(&self) -> Vec<StorageCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl StorageAdapter for RecordingStorage {
    async fn conditional_insert(
        &self,
        key: &DedupKey,
        _event: &NewEvent,
    ) -> Result<InsertOutcome, DomainError> {
        self.calls
            .lock()
            .push(StorageCall::ConditionalInsert(key.clone()));
        Ok(self.insert_outcome.clone())
    }

    async fn atomic_increment(&self, counter: &str) -> Result<u64, DomainError> {
        self.calls
            .lock()
            .push(StorageCall::AtomicIncrement(counter.to_owned()));
        if self.fail_increment {
            return Err(DomainError::StorageUnavailable("connection reset".into()));
        }
        Ok(1)
    }

    async fn counter_value(&self, _counter: &str) -> Result<u64, DomainError> {
        self.calls.lock().push(StorageCall::Read("counter_value"));
        Ok(0)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        self.calls.lock().push(StorageCall::Read("count"));
        Ok(0)
    }

    async fn count_distinct_topics(&self) -> Result<u64, DomainError> {
        self.calls
            .lock()
            .push(StorageCall::Read("count_distinct_topics"));
        Ok(0)
    }

    async fn stats_snapshot(&self) -> Result<LedgerStats, DomainError> {
        self.calls.lock().push(StorageCall::Read("stats_snapshot"));
        Ok(LedgerStats::default())
    }

    async fn fetch_recent(&self, limit: usize) -> Result<Vec<StoredEvent>, DomainError> {
        self.calls.lock().push(StorageCall::FetchRecent(limit));
        Ok(vec![])
    }
}

/// A storage adapter that always reports the backend as unavailable. Useful
/// for testing error-handling paths.
#[derive(Debug)]
pub struct FailingStorage;

fn unavailable() -> DomainError {
    DomainError::StorageUnavailable("connection refused".into())
}

#[async_trait]
impl StorageAdapter for FailingStorage {
    async fn conditional_insert(
        &self,
        _key: &DedupKey,
        _event: &NewEvent,
    ) -> Result<InsertOutcome, DomainError> {
        Err(unavailable())
    }

    async fn atomic_increment(&self, _counter: &str) -> Result<u64, DomainError> {
        Err(unavailable())
    }

    async fn counter_value(&self, _counter: &str) -> Result<u64, DomainError> {
        Err(unavailable())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Err(unavailable())
    }

    async fn count_distinct_topics(&self) -> Result<u64, DomainError> {
        Err(unavailable())
    }

    async fn stats_snapshot(&self) -> Result<LedgerStats, DomainError> {
        Err(unavailable())
    }

    async fn fetch_recent(&self, _limit: usize) -> Result<Vec<StoredEvent>, DomainError> {
        Err(unavailable())
    }
}
