//! Dedupgate API server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use dedupgate_api::config::{Config, StorageBackend};
use dedupgate_api::error::AppError;
use dedupgate_api::routes;
use dedupgate_api::state::AppState;
use dedupgate_core::clock::{Clock, WallClock};
use dedupgate_core::storage::StorageAdapter;
use dedupgate_store::memory::InMemoryStorageAdapter;
use dedupgate_store::pg_storage::PgStorageAdapter;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

async fn connect_storage(
    config: &Config,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn StorageAdapter>, AppError> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; the ledger is lost on restart");
            Ok(Arc::new(InMemoryStorageAdapter::new(clock)))
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| AppError::Config("DATABASE_URL must be set".into()))?;

            // Callers queue for a connection up to `acquire_timeout`, then
            // get a retryable error.
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(config.acquire_timeout)
                .connect(database_url)
                .await?;

            sqlx::migrate!("../../migrations").run(&pool).await?;
            tracing::info!(
                max_connections = config.max_connections,
                "connected to PostgreSQL and applied migrations"
            );

            Ok(Arc::new(PgStorageAdapter::new(pool)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting dedupgate API server");

    let config = Config::from_env()?;
    let clock: Arc<dyn Clock> = Arc::new(WallClock);
    let storage = connect_storage(&config, Arc::clone(&clock)).await?;

    let app_state = AppState::new(storage, clock);

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| format!("invalid HOST:PORT combination: {e}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
