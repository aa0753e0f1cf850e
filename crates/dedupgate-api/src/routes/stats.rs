//! Stats endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};

use dedupgate_ingestion::application::query_handlers::{self, StatsSnapshot};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /stats
async fn stats(State(state): State<AppState>) -> Result<Json<StatsSnapshot>, ApiError> {
    let snapshot = query_handlers::get_stats(
        state.storage.as_ref(),
        state.clock.as_ref(),
        state.started_at,
    )
    .await?;

    Ok(Json(snapshot))
}

/// Returns the router for the stats endpoint.
pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(stats))
}
