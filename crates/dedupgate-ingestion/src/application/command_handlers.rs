//! Command handlers for the ingestion context.
//!
//! `handle_ingest` issues exactly one conditional insert per call and never
//! reads the ledger first. Running it again for a key that already landed
//! yields `Duplicate`, so callers may retry after any failure.

use dedupgate_core::error::DomainError;
use dedupgate_core::event::DedupKey;
use dedupgate_core::storage::{DUPLICATES_DROPPED, InsertOutcome, StorageAdapter};
use tracing::{debug, error, info, warn};

use crate::domain::commands::IngestEvent;
use crate::domain::outcome::IngestOutcome;

fn log_storage_failure(command: &IngestEvent, key: &DedupKey, err: &DomainError) {
    if let DomainError::InvariantViolation(_) = err {
        error!(
            correlation_id = %command.correlation_id,
            %key,
            error = %err,
            "storage atomicity contract broken"
        );
    } else {
        warn!(
            correlation_id = %command.correlation_id,
            %key,
            error = %err,
            retryable = err.is_retryable(),
            "ingest failed"
        );
    }
}

/// Handles the `IngestEvent` command: conditionally inserts the event under
/// its dedup key and, on conflict, bumps the `duplicates_dropped` counter.
///
/// # Errors
///
/// Returns `DomainError::StorageUnavailable` if the outcome could not be
/// determined (or the duplicate could not be counted); the caller may retry.
/// Returns `DomainError::InvariantViolation` if the adapter reports an insert
/// for a different key than the one requested.
pub async fn handle_ingest(
    command: &IngestEvent,
    storage: &dyn StorageAdapter,
) -> Result<IngestOutcome, DomainError> {
    let key = command.event.dedup_key();

    let inserted = storage
        .conditional_insert(&key, &command.event)
        .await
        .inspect_err(|err| log_storage_failure(command, &key, err))?;

    match inserted {
        InsertOutcome::Inserted(stored) => {
            if !stored.has_key(&key) {
                let err = DomainError::InvariantViolation(format!(
                    "insert for {key} reported record {}/{}",
                    stored.topic, stored.event_id
                ));
                log_storage_failure(command, &key, &err);
                return Err(err);
            }
            info!(
                correlation_id = %command.correlation_id,
                command = IngestEvent::KIND,
                %key,
                "event accepted"
            );
            Ok(IngestOutcome::Accepted(stored))
        }
        InsertOutcome::AlreadyExists => {
            let dropped = storage
                .atomic_increment(DUPLICATES_DROPPED)
                .await
                .inspect_err(|err| log_storage_failure(command, &key, err))?;
            debug!(
                correlation_id = %command.correlation_id,
                %key,
                duplicates_dropped = dropped,
                "duplicate event dropped"
            );
            Ok(IngestOutcome::Duplicate)
        }
    }
}
