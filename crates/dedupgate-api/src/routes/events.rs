//! Recent-events listing.

use axum::extract::{Query, State};
use axum::{Json, Router, routing::get};
use serde::Deserialize;

use dedupgate_core::event::StoredEvent;
use dedupgate_ingestion::application::query_handlers;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for GET /events.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// Maximum number of records; defaults to 10.
    pub limit: Option<i64>,
}

/// GET /events
async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Vec<StoredEvent>>, ApiError> {
    let events = query_handlers::list_recent(query.limit, state.storage.as_ref()).await?;
    Ok(Json(events))
}

/// Returns the router for the events listing.
pub fn router() -> Router<AppState> {
    Router::new().route("/events", get(list_events))
}
