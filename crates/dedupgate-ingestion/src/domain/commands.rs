//! Commands for the ingestion context.

use dedupgate_core::event::NewEvent;
use uuid::Uuid;

/// Command to ingest one validated event.
#[derive(Debug, Clone)]
pub struct IngestEvent {
    /// Ties the ingest's log lines to the request that caused it.
    pub correlation_id: Uuid,
    /// The event to record.
    pub event: NewEvent,
}

impl IngestEvent {
    /// Name used for this command in structured logs.
    pub const KIND: &'static str = "ingestion.ingest_event";

    /// Wraps `event` with a fresh correlation id.
    #[must_use]
    pub fn new(event: NewEvent) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            event,
        }
    }
}
