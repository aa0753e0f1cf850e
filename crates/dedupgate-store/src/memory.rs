//! In-process implementation of the `StorageAdapter` trait.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use dedupgate_core::clock::Clock;
use dedupgate_core::error::DomainError;
use dedupgate_core::event::{DedupKey, NewEvent, StoredEvent};
use dedupgate_core::storage::{
    COUNTERS, DUPLICATES_DROPPED, InsertOutcome, LedgerStats, StorageAdapter,
};

#[derive(Debug, Default)]
struct Ledger {
    /// Position of each key's record in `records`.
    index: HashMap<DedupKey, usize>,
    /// Records in insertion order.
    records: Vec<StoredEvent>,
    topics: HashSet<String>,
}

/// Ledger and counters held in memory.
///
/// The conditional insert takes the ledger write lock for the whole
/// check-and-insert, so it is atomic with respect to every other caller.
/// Counters are plain atomics created once at construction.
pub struct InMemoryStorageAdapter {
    ledger: RwLock<Ledger>,
    counters: HashMap<&'static str, AtomicU64>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStorageAdapter {
    /// Creates an empty store whose `ingested_at` stamps come from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger: RwLock::new(Ledger::default()),
            counters: COUNTERS
                .iter()
                .map(|name| (*name, AtomicU64::new(0)))
                .collect(),
            clock,
        }
    }

    fn counter(&self, name: &str) -> Result<&AtomicU64, DomainError> {
        self.counters.get(name).ok_or_else(|| {
            DomainError::InvariantViolation(format!("counter {name} is not initialised"))
        })
    }
}

impl std::fmt::Debug for InMemoryStorageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStorageAdapter")
            .field("records", &self.ledger.read().records.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StorageAdapter for InMemoryStorageAdapter {
    async fn conditional_insert(
        &self,
        key: &DedupKey,
        event: &NewEvent,
    ) -> Result<InsertOutcome, DomainError> {
        let mut guard = self.ledger.write();
        let ledger = &mut *guard;
        match ledger.index.entry(key.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                let stored = event.clone().into_stored(self.clock.now());
                slot.insert(ledger.records.len());
                ledger.topics.insert(stored.topic.clone());
                ledger.records.push(stored.clone());
                Ok(InsertOutcome::Inserted(stored))
            }
        }
    }

    async fn atomic_increment(&self, counter: &str) -> Result<u64, DomainError> {
        Ok(self.counter(counter)?.fetch_add(1, Ordering::AcqRel) + 1)
    }

    async fn counter_value(&self, counter: &str) -> Result<u64, DomainError> {
        Ok(self.counter(counter)?.load(Ordering::Acquire))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.ledger.read().records.len() as u64)
    }

    async fn count_distinct_topics(&self) -> Result<u64, DomainError> {
        Ok(self.ledger.read().topics.len() as u64)
    }

    async fn stats_snapshot(&self) -> Result<LedgerStats, DomainError> {
        // Holding the read lock pins the ledger while the counter is loaded.
        let ledger = self.ledger.read();
        Ok(LedgerStats {
            unique_count: ledger.records.len() as u64,
            duplicate_count: self.counter(DUPLICATES_DROPPED)?.load(Ordering::Acquire),
            topic_count: ledger.topics.len() as u64,
        })
    }

    async fn fetch_recent(&self, limit: usize) -> Result<Vec<StoredEvent>, DomainError> {
        let ledger = self.ledger.read();
        let mut ordered: Vec<(usize, &StoredEvent)> = ledger.records.iter().enumerate().collect();
        // Newest `ingested_at` first; insertion order breaks ties.
        ordered.sort_by(|(ia, a), (ib, b)| b.ingested_at.cmp(&a.ingested_at).then(ib.cmp(ia)));
        Ok(ordered
            .into_iter()
            .take(limit)
            .map(|(_, record)| record.clone())
            .collect())
    }
}
