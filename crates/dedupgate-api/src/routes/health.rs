//! Liveness endpoint.
//!
//! Answers without touching storage, so a database outage shows up as 503s
//! on `/publish` and `/stats` while the process itself stays "up".

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Body of GET /health.
#[derive(Debug, Serialize)]
pub struct Liveness {
    /// Always `"ok"` while the process serves requests.
    pub status: &'static str,
    /// Name of this service.
    pub service: &'static str,
    /// Crate version of the running binary.
    pub version: &'static str,
}

const LIVENESS: Liveness = Liveness {
    status: "ok",
    service: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
};

/// GET /health
async fn liveness() -> Json<Liveness> {
    Json(LIVENESS)
}

/// Returns the liveness router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(liveness))
}
