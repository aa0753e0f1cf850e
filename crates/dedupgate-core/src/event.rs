//! Event records and their dedup key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `(topic, event_id)` pair that identifies a logical event.
///
/// `event_id` is only unique within its topic, so the same id under two
/// topics yields two different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    /// Producer-assigned logical channel.
    pub topic: String,
    /// Producer-assigned identifier, scoped to `topic`.
    pub event_id: String,
}

impl std::fmt::Display for DedupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.topic, self.event_id)
    }
}

/// A validated event submission that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    /// Producer-assigned logical channel.
    pub topic: String,
    /// Producer-assigned identifier, scoped to `topic`.
    pub event_id: String,
    /// Producer-supplied event time.
    pub timestamp: DateTime<Utc>,
    /// Free-form producer identity.
    pub source: String,
    /// Opaque structured payload.
    pub payload: Map<String, Value>,
}

impl NewEvent {
    /// Derives the dedup key for this event.
    #[must_use]
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            topic: self.topic.clone(),
            event_id: self.event_id.clone(),
        }
    }

    /// Builds the ledger row for this event, stamped with the store's
    /// ingestion time.
    #[must_use]
    pub fn into_stored(self, ingested_at: DateTime<Utc>) -> StoredEvent {
        StoredEvent {
            topic: self.topic,
            event_id: self.event_id,
            timestamp: self.timestamp,
            source: self.source,
            payload: self.payload,
            ingested_at,
        }
    }
}

/// An event record as held in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Producer-assigned logical channel.
    pub topic: String,
    /// Producer-assigned identifier, scoped to `topic`.
    pub event_id: String,
    /// Producer-supplied event time.
    pub timestamp: DateTime<Utc>,
    /// Free-form producer identity.
    pub source: String,
    /// Opaque structured payload.
    pub payload: Map<String, Value>,
    /// Assigned by the store when the record was accepted.
    pub ingested_at: DateTime<Utc>,
}

impl StoredEvent {
    /// Returns `true` if this record was stored under `key`.
    #[must_use]
    pub fn has_key(&self, key: &DedupKey) -> bool {
        self.topic == key.topic && self.event_id == key.event_id
    }
}
