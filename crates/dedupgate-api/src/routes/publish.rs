//! Ingestion endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use dedupgate_core::error::DomainError;
use dedupgate_core::event::NewEvent;
use dedupgate_ingestion::application::command_handlers;
use dedupgate_ingestion::domain::commands::IngestEvent;
use dedupgate_ingestion::domain::outcome::IngestOutcome;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /publish.
///
/// Missing fields and unparsable timestamps are rejected by the `Json`
/// extractor with 422 before the handler runs.
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    /// Logical channel; must not be blank.
    pub topic: String,
    /// Identifier within `topic`; must not be blank.
    pub event_id: String,
    /// Producer event time, RFC 3339.
    pub timestamp: DateTime<Utc>,
    /// Producer identity.
    pub source: String,
    /// Opaque JSON object.
    pub payload: Map<String, Value>,
}

impl PublishRequest {
    fn into_event(self) -> Result<NewEvent, DomainError> {
        if self.topic.trim().is_empty() {
            return Err(DomainError::Validation("topic must not be empty".into()));
        }
        if self.event_id.trim().is_empty() {
            return Err(DomainError::Validation("event_id must not be empty".into()));
        }
        Ok(NewEvent {
            topic: self.topic,
            event_id: self.event_id,
            timestamp: self.timestamp,
            source: self.source,
            payload: self.payload,
        })
    }
}

/// Outcome reported to the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    /// The event was recorded.
    Success,
    /// The event was a duplicate and was dropped.
    Ignored,
}

/// Response body for POST /publish.
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    /// Accepted or dropped.
    pub status: PublishStatus,
    /// Human-readable summary.
    pub message: &'static str,
}

impl From<&IngestOutcome> for PublishResponse {
    fn from(outcome: &IngestOutcome) -> Self {
        match outcome {
            IngestOutcome::Accepted(_) => Self {
                status: PublishStatus::Success,
                message: "Event processed",
            },
            IngestOutcome::Duplicate => Self {
                status: PublishStatus::Ignored,
                message: "Duplicate event detected",
            },
        }
    }
}

/// POST /publish
#[instrument(
    skip(state, request),
    fields(topic = %request.topic, event_id = %request.event_id)
)]
async fn publish(
    State(state): State<AppState>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<PublishResponse>, ApiError> {
    let command = IngestEvent::new(request.into_event()?);

    let outcome = command_handlers::handle_ingest(&command, state.storage.as_ref()).await?;

    Ok(Json(PublishResponse::from(&outcome)))
}

/// Returns the router for the ingestion endpoint.
pub fn router() -> Router<AppState> {
    Router::new().route("/publish", post(publish))
}
