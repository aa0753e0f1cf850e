//! `PostgreSQL` implementation of the `StorageAdapter` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::debug;

use dedupgate_core::error::DomainError;
use dedupgate_core::event::{DedupKey, NewEvent, StoredEvent};
use dedupgate_core::storage::{DUPLICATES_DROPPED, InsertOutcome, LedgerStats, StorageAdapter};

use crate::queries;

/// PostgreSQL-backed storage adapter.
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct PgStorageAdapter {
    pool: PgPool,
}

impl PgStorageAdapter {
    /// Creates a new `PgStorageAdapter`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LedgerRow {
    topic: String,
    event_id: String,
    timestamp: DateTime<Utc>,
    source: String,
    payload: Json<Map<String, Value>>,
    ingested_at: DateTime<Utc>,
}

impl From<LedgerRow> for StoredEvent {
    fn from(row: LedgerRow) -> Self {
        Self {
            topic: row.topic,
            event_id: row.event_id,
            timestamp: row.timestamp,
            source: row.source,
            payload: row.payload.0,
            ingested_at: row.ingested_at,
        }
    }
}

/// Maps a driver error onto the domain taxonomy.
///
/// Row-shape problems mean the schema does not match what this adapter was
/// written against; everything else (pool timeouts, I/O, server errors) is
/// treated as a transient outage.
fn classify(err: sqlx::Error) -> DomainError {
    match err {
        sqlx::Error::RowNotFound
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::TypeNotFound { .. } => DomainError::InvariantViolation(err.to_string()),
        other => DomainError::StorageUnavailable(other.to_string()),
    }
}

fn to_count(value: i64, what: &str) -> Result<u64, DomainError> {
    u64::try_from(value)
        .map_err(|_| DomainError::InvariantViolation(format!("{what} is negative: {value}")))
}

#[async_trait]
impl StorageAdapter for PgStorageAdapter {
    async fn conditional_insert(
        &self,
        key: &DedupKey,
        event: &NewEvent,
    ) -> Result<InsertOutcome, DomainError> {
        let ingested_at: Option<DateTime<Utc>> = sqlx::query_scalar(queries::INSERT_EVENT)
            .bind(&key.topic)
            .bind(&key.event_id)
            .bind(event.timestamp)
            .bind(&event.source)
            .bind(Json(&event.payload))
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;

        match ingested_at {
            Some(ingested_at) => {
                debug!(%key, "ledger row inserted");
                Ok(InsertOutcome::Inserted(
                    event.clone().into_stored(ingested_at),
                ))
            }
            None => Ok(InsertOutcome::AlreadyExists),
        }
    }

    async fn atomic_increment(&self, counter: &str) -> Result<u64, DomainError> {
        let value: Option<i64> = sqlx::query_scalar(queries::INCREMENT_COUNTER)
            .bind(counter)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;

        let value = value.ok_or_else(|| {
            DomainError::InvariantViolation(format!("counter {counter} is not initialised"))
        })?;
        to_count(value, counter)
    }

    async fn counter_value(&self, counter: &str) -> Result<u64, DomainError> {
        let value: Option<i64> = sqlx::query_scalar(queries::SELECT_COUNTER)
            .bind(counter)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;

        let value = value.ok_or_else(|| {
            DomainError::InvariantViolation(format!("counter {counter} is not initialised"))
        })?;
        to_count(value, counter)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let value: i64 = sqlx::query_scalar(queries::COUNT_EVENTS)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        to_count(value, "event count")
    }

    async fn count_distinct_topics(&self) -> Result<u64, DomainError> {
        let value: i64 = sqlx::query_scalar(queries::COUNT_DISTINCT_TOPICS)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        to_count(value, "topic count")
    }

    async fn stats_snapshot(&self) -> Result<LedgerStats, DomainError> {
        let (unique_count, duplicate_count, topic_count): (i64, Option<i64>, i64) =
            sqlx::query_as(queries::SELECT_STATS)
                .bind(DUPLICATES_DROPPED)
                .fetch_one(&self.pool)
                .await
                .map_err(classify)?;

        let duplicate_count = duplicate_count.ok_or_else(|| {
            DomainError::InvariantViolation(format!(
                "counter {DUPLICATES_DROPPED} is not initialised"
            ))
        })?;

        Ok(LedgerStats {
            unique_count: to_count(unique_count, "event count")?,
            duplicate_count: to_count(duplicate_count, DUPLICATES_DROPPED)?,
            topic_count: to_count(topic_count, "topic count")?,
        })
    }

    async fn fetch_recent(&self, limit: usize) -> Result<Vec<StoredEvent>, DomainError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<LedgerRow> = sqlx::query_as(queries::SELECT_RECENT)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        Ok(rows.into_iter().map(StoredEvent::from).collect())
    }
}
