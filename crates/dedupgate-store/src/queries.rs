//! SQL statements issued by the PostgreSQL adapter.
//!
//! The table layout lives in the workspace `migrations/` directory.

/// Insert-if-absent on the `(topic, event_id)` primary key. Returns a row
/// only when the insert landed.
pub(crate) const INSERT_EVENT: &str = r"
INSERT INTO processed_events (topic, event_id, timestamp, source, payload)
VALUES ($1, $2, $3, $4, $5)
ON CONFLICT (topic, event_id) DO NOTHING
RETURNING ingested_at
";

/// Single-statement increment; no read-modify-write in the application.
pub(crate) const INCREMENT_COUNTER: &str = r"
UPDATE audit_stats
SET counter = counter + 1
WHERE metric_key = $1
RETURNING counter
";

pub(crate) const SELECT_COUNTER: &str = r"
SELECT counter FROM audit_stats WHERE metric_key = $1
";

pub(crate) const COUNT_EVENTS: &str = r"
SELECT COUNT(*) FROM processed_events
";

pub(crate) const COUNT_DISTINCT_TOPICS: &str = r"
SELECT COUNT(DISTINCT topic) FROM processed_events
";

/// One statement, so all three sub-selects share a single snapshot.
pub(crate) const SELECT_STATS: &str = r"
SELECT
    (SELECT COUNT(*) FROM processed_events) AS unique_count,
    (SELECT counter FROM audit_stats WHERE metric_key = $1) AS duplicate_count,
    (SELECT COUNT(DISTINCT topic) FROM processed_events) AS topic_count
";

pub(crate) const SELECT_RECENT: &str = r"
SELECT topic, event_id, timestamp, source, payload, ingested_at
FROM processed_events
ORDER BY ingested_at DESC, seq DESC
LIMIT $1
";
