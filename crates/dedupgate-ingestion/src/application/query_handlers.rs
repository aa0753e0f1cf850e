//! Query handlers for the ingestion context.
//!
//! Read-side aggregation over the ledger and the counters table. The stats
//! figures come from one storage read; they are not linearized against
//! concurrent ingests.

use chrono::{DateTime, TimeDelta, Utc};
use dedupgate_core::clock::Clock;
use dedupgate_core::error::DomainError;
use dedupgate_core::event::StoredEvent;
use dedupgate_core::storage::StorageAdapter;
use serde::Serialize;
use tracing::error;

/// Number of records `list_recent` returns when no limit is given.
pub const DEFAULT_LIST_LIMIT: i64 = 10;

/// Largest limit `list_recent` honours; larger requests are clamped.
pub const MAX_LIST_LIMIT: i64 = 1000;

/// Aggregate view of the gateway's activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    /// Every submission that reached storage: `unique_processed + duplicate_dropped`.
    pub received: u64,
    /// Records in the ledger.
    pub unique_processed: u64,
    /// Submissions rejected as duplicates.
    pub duplicate_dropped: u64,
    /// Distinct topics among stored records.
    pub topics_active: u64,
    /// Seconds since the process started, to two decimals.
    pub uptime_seconds: f64,
}

#[allow(clippy::cast_precision_loss)]
fn uptime_seconds(elapsed: TimeDelta) -> f64 {
    (elapsed.num_milliseconds() as f64 / 10.0).round() / 100.0
}

/// Computes the current stats snapshot.
///
/// # Errors
///
/// Returns `DomainError::StorageUnavailable` if the aggregate read fails.
/// Returns `DomainError::InvariantViolation` if the duplicates counter is
/// missing.
pub async fn get_stats(
    storage: &dyn StorageAdapter,
    clock: &dyn Clock,
    started_at: DateTime<Utc>,
) -> Result<StatsSnapshot, DomainError> {
    let stats = storage.stats_snapshot().await.inspect_err(|err| {
        if let DomainError::InvariantViolation(_) = err {
            error!(error = %err, "stats read hit a broken storage invariant");
        }
    })?;

    Ok(StatsSnapshot {
        received: stats.unique_count + stats.duplicate_count,
        unique_processed: stats.unique_count,
        duplicate_dropped: stats.duplicate_count,
        topics_active: stats.topic_count,
        uptime_seconds: uptime_seconds(clock.elapsed_since(started_at)),
    })
}

/// Returns up to `limit` records, most recently ingested first.
///
/// `None` means [`DEFAULT_LIST_LIMIT`]; `Some(0)` yields an empty list
/// without touching storage; limits above [`MAX_LIST_LIMIT`] are clamped.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a negative limit.
/// Returns `DomainError::StorageUnavailable` if the query fails.
pub async fn list_recent(
    limit: Option<i64>,
    storage: &dyn StorageAdapter,
) -> Result<Vec<StoredEvent>, DomainError> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if limit < 0 {
        return Err(DomainError::Validation(format!(
            "limit must not be negative, got {limit}"
        )));
    }
    if limit == 0 {
        return Ok(Vec::new());
    }

    let limit = usize::try_from(limit.min(MAX_LIST_LIMIT))
        .map_err(|e| DomainError::Validation(format!("limit out of range: {e}")))?;
    storage.fetch_recent(limit).await
}
