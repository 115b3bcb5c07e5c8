//! Main application run loop

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::Config;
use crate::errors::BridgeError;
use crate::http::client::HttpClient;
use crate::server::serve::serve;
use crate::server::state::ServerState;
use crate::validation::engine::ValidationEngine;
use crate::webhook::verify::SignatureVerifier;

/// Maximum delay for graceful shutdown
const MAX_SHUTDOWN_DELAY: Duration = Duration::from_secs(30);

/// Run the gatekeeper service
pub async fn run(
    config: Config,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), BridgeError> {
    info!("Initializing gatekeeper...");

    let Config {
        api_key,
        webhook_secret,
        platform_base_url,
        tolerance,
        server,
        ..
    } = config;

    let (shutdown_tx, _shutdown_rx): (broadcast::Sender<()>, _) = broadcast::channel(1);

    let verifier = SignatureVerifier::new(&webhook_secret, tolerance)?;
    let platform = Arc::new(HttpClient::new(&platform_base_url, api_key)?);
    let engine = ValidationEngine::with_default_policy();
    let state = ServerState::new(verifier, platform, engine);

    let mut server_shutdown_rx = shutdown_tx.subscribe();
    let server_handle = serve(&server, Arc::new(state), async move {
        let _ = server_shutdown_rx.recv().await;
    })
    .await?;

    shutdown_signal.await;

    let _ = shutdown_tx.send(());
    shutdown(server_handle).await
}

async fn shutdown(server_handle: JoinHandle<Result<(), BridgeError>>) -> Result<(), BridgeError> {
    info!("Shutting down gatekeeper...");

    match tokio::time::timeout(MAX_SHUTDOWN_DELAY, server_handle).await {
        Ok(result) => {
            result.map_err(|e| BridgeError::ShutdownError(e.to_string()))??;
            info!("Shutdown complete");
            Ok(())
        }
        Err(_) => {
            error!(
                "Shutdown timed out after {:?}, forcing shutdown...",
                MAX_SHUTDOWN_DELAY
            );
            std::process::exit(1);
        }
    }
}
