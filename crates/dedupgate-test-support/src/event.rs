//! Event fixtures.

use chrono::{TimeZone, Utc};
use dedupgate_core::event::NewEvent;
use serde_json::json;

/// Builds a well-formed event with a fixed timestamp and a small payload.
///
/// # Panics
///
/// Never in practice; the fixed timestamp is a valid calendar date.
#[must_use]
pub fn sample_event(topic: &str, event_id: &str) -> NewEvent {
    let payload = json!({ "amount": 250, "status": "active" });
    NewEvent {
        topic: topic.to_owned(),
        event_id: event_id.to_owned(),
        timestamp: Utc.with_ymd_and_hms(2026, 1, 15, 9, 59, 0).unwrap(),
        source: "test-support".to_owned(),
        payload: payload.as_object().cloned().unwrap_or_default(),
    }
}
