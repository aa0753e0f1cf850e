//! Integration tests for `PgStorageAdapter`.

use std::sync::Arc;

use dedupgate_core::error::DomainError;
use dedupgate_core::storage::{DUPLICATES_DROPPED, InsertOutcome, LedgerStats, StorageAdapter};
use dedupgate_store::pg_storage::PgStorageAdapter;
use dedupgate_test_support::sample_event;
use sqlx::PgPool;

// --- conditional_insert ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_conditional_insert_then_conflict(pool: PgPool) {
    let storage = PgStorageAdapter::new(pool);
    let event = sample_event("user_login", "evt-1");
    let key = event.dedup_key();

    let first = storage.conditional_insert(&key, &event).await.unwrap();
    let second = storage.conditional_insert(&key, &event).await.unwrap();

    match first {
        InsertOutcome::Inserted(stored) => {
            assert!(stored.has_key(&key));
            assert_eq!(stored.payload, event.payload);
            assert_eq!(stored.timestamp, event.timestamp);
        }
        other => panic!("expected Inserted, got {other:?}"),
    }
    assert_eq!(second, InsertOutcome::AlreadyExists);
    assert_eq!(storage.count().await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_same_event_id_in_two_topics_both_insert(pool: PgPool) {
    let storage = PgStorageAdapter::new(pool);
    let a = sample_event("Topic_A", "shared");
    let b = sample_event("Topic_B", "shared");

    let res_a = storage.conditional_insert(&a.dedup_key(), &a).await.unwrap();
    let res_b = storage.conditional_insert(&b.dedup_key(), &b).await.unwrap();

    assert!(matches!(res_a, InsertOutcome::Inserted(_)));
    assert!(matches!(res_b, InsertOutcome::Inserted(_)));
    assert_eq!(storage.count_distinct_topics().await.unwrap(), 2);
}

// --- concurrency ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_concurrent_inserts_of_one_key_land_exactly_once(pool: PgPool) {
    let storage = Arc::new(PgStorageAdapter::new(pool));
    let event = Arc::new(sample_event("race_test", "race-1"));

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let storage = Arc::clone(&storage);
            let event = Arc::clone(&event);
            tokio::spawn(async move {
                storage
                    .conditional_insert(&event.dedup_key(), &event)
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut inserted = 0;
    let mut existing = 0;
    for handle in handles {
        match handle.await.unwrap() {
            InsertOutcome::Inserted(_) => inserted += 1,
            InsertOutcome::AlreadyExists => existing += 1,
        }
    }

    assert_eq!(inserted, 1);
    assert_eq!(existing, 9);
}

// --- counters ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicates_counter_is_seeded_and_increments(pool: PgPool) {
    let storage = PgStorageAdapter::new(pool);

    assert_eq!(storage.counter_value(DUPLICATES_DROPPED).await.unwrap(), 0);
    assert_eq!(storage.atomic_increment(DUPLICATES_DROPPED).await.unwrap(), 1);
    assert_eq!(storage.atomic_increment(DUPLICATES_DROPPED).await.unwrap(), 2);
    assert_eq!(storage.counter_value(DUPLICATES_DROPPED).await.unwrap(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_concurrent_increments_lose_no_updates(pool: PgPool) {
    let storage = Arc::new(PgStorageAdapter::new(pool));

    let handles: Vec<_> = (0..25)
        .map(|_| {
            let storage = Arc::clone(&storage);
            tokio::spawn(async move { storage.atomic_increment(DUPLICATES_DROPPED).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(storage.counter_value(DUPLICATES_DROPPED).await.unwrap(), 25);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_unknown_counter_is_an_invariant_violation(pool: PgPool) {
    let storage = PgStorageAdapter::new(pool);

    let result = storage.atomic_increment("no_such_counter").await;

    match result {
        Err(DomainError::InvariantViolation(message)) => {
            assert!(message.contains("no_such_counter"));
        }
        other => panic!("expected InvariantViolation, got {other:?}"),
    }
}

// --- stats_snapshot ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_stats_snapshot_on_fresh_schema_is_all_zero(pool: PgPool) {
    let storage = PgStorageAdapter::new(pool);

    assert_eq!(storage.stats_snapshot().await.unwrap(), LedgerStats::default());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_stats_snapshot_reads_events_counter_and_topics(pool: PgPool) {
    let storage = PgStorageAdapter::new(pool);
    for (topic, id) in [("orders", "o-1"), ("orders", "o-2"), ("payments", "p-1")] {
        let event = sample_event(topic, id);
        storage.conditional_insert(&event.dedup_key(), &event).await.unwrap();
    }
    storage.atomic_increment(DUPLICATES_DROPPED).await.unwrap();
    storage.atomic_increment(DUPLICATES_DROPPED).await.unwrap();

    let stats = storage.stats_snapshot().await.unwrap();

    assert_eq!(
        stats,
        LedgerStats {
            unique_count: 3,
            duplicate_count: 2,
            topic_count: 2,
        }
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_stats_snapshot_without_counter_row_is_an_invariant_violation(pool: PgPool) {
    sqlx::query("DELETE FROM audit_stats")
        .execute(&pool)
        .await
        .unwrap();
    let storage = PgStorageAdapter::new(pool);

    let err = storage.stats_snapshot().await.unwrap_err();

    assert!(matches!(err, DomainError::InvariantViolation(_)));
}

// --- fetch_recent ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_fetch_recent_returns_newest_first(pool: PgPool) {
    let storage = PgStorageAdapter::new(pool);
    for id in ["a", "b", "c"] {
        let event = sample_event("orders", id);
        storage
            .conditional_insert(&event.dedup_key(), &event)
            .await
            .unwrap();
    }

    let recent = storage.fetch_recent(2).await.unwrap();
    let ids: Vec<&str> = recent.iter().map(|e| e.event_id.as_str()).collect();

    assert_eq!(ids, vec!["c", "b"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_fetch_recent_with_large_limit_returns_everything(pool: PgPool) {
    let storage = PgStorageAdapter::new(pool);
    let event = sample_event("orders", "only");
    storage
        .conditional_insert(&event.dedup_key(), &event)
        .await
        .unwrap();

    let recent = storage.fetch_recent(1000).await.unwrap();

    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].payload, event.payload);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_closed_pool_is_reported_as_storage_unavailable(pool: PgPool) {
    pool.close().await;
    let storage = PgStorageAdapter::new(pool);

    let result = storage.count().await;

    assert!(matches!(result, Err(DomainError::StorageUnavailable(_))));
}
