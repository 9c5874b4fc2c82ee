//! Application builder: wires router, middleware and state into an Axum app.

use std::time::Duration;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use deskbook_core::config::ServerConfig;
use deskbook_core::error::{AppError, ErrorKind};

use crate::middleware::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    build_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_seconds)))
        .layer(build_cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve `app` until Ctrl+C.
pub async fn serve(app: Router, config: &ServerConfig) -> Result<(), AppError> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, format!("Failed to bind {addr}"), e)
    })?;

    info!(address = %addr, "Deskbook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
