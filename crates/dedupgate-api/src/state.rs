//! Shared application state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dedupgate_core::clock::Clock;
use dedupgate_core::storage::StorageAdapter;

/// Application state shared across all request handlers.
///
/// Holds no mutable data of its own; everything shared lives in the storage
/// adapter, so any number of gateway processes can serve one store.
#[derive(Clone)]
pub struct AppState {
    /// Backing store for the ledger and counters.
    pub storage: Arc<dyn StorageAdapter>,
    /// Clock used for uptime reporting.
    pub clock: Arc<dyn Clock>,
    /// When this process started serving.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create new application state, stamping `started_at` from `clock`.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageAdapter>, clock: Arc<dyn Clock>) -> Self {
        let started_at = clock.now();
        Self {
            storage,
            clock,
            started_at,
        }
    }
}
