//! HTTP surface: router construction and server lifecycle.

use crate::job::JobStore;
use crate::orchestrator::JobOrchestrator;
use crate::shutdown::SharedShutdown;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod handlers;
pub mod models;

/// Per-request timeout. Submission and polling are both in-memory operations,
/// so anything slower than this indicates a wedged handler.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shared handles for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Job driver used by the start endpoint.
    pub orchestrator: Arc<JobOrchestrator>,
    /// Registry used by the polling endpoint.
    pub store: JobStore,
}

/// Build the application router with request tracing and a timeout layer.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/analytics/bulk/start",
            post(handlers::start_bulk_analytics),
        )
        .route(
            "/analytics/bulk/status/{run_id}",
            get(handlers::job_status),
        )
        .route("/health", get(handlers::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS))),
        )
        .with_state(state)
}

/// Bind `addr` and serve until the shutdown coordinator fires.
pub async fn run_server(
    addr: SocketAddr,
    state: AppState,
    shutdown: SharedShutdown,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "server listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async move { shutdown.wait_for_shutdown().await })
        .await?;

    info!("server shutdown complete");
    Ok(())
}
