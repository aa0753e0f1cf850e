//! Route modules.

use axum::Router;

use crate::state::AppState;

pub mod events;
pub mod health;
pub mod publish;
pub mod stats;

/// All gateway routes, unlayered and awaiting state.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(publish::router())
        .merge(stats::router())
        .merge(events::router())
}
