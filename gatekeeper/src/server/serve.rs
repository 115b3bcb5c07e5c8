//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerOptions;
use crate::errors::BridgeError;
use crate::server::handlers::{health_handler, webhook_handler};
use crate::server::state::ServerState;

/// Build the router
pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Health
        .route("/", get(health_handler))
        // Webhooks
        .route("/webhooks/platform", post(webhook_handler))
        // State and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), BridgeError>>, BridgeError> {
    let app = build_router(state);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| BridgeError::ServerError(e.to_string()))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| BridgeError::ServerError(e.to_string()))
    });

    Ok(handle)
}
