//! # Initialization
//!
//! Operator start-up: rustls setup, tracing, metrics, server startup,
//! Kubernetes client and reconciler context.

use crate::config::ControllerConfig;
use crate::controller::reconciler::{KubeStore, ObjectStore, Reconciler};
use crate::controller::server::{start_server, ServerState};
use crate::observability;
use crate::provider::Dispatcher;
use anyhow::{Context, Result};
use kube::Client;
use std::sync::Arc;
use tracing::{error, info};

/// Everything the watch loop needs
pub struct InitializationResult {
    pub client: Client,
    pub reconciler: Arc<Reconciler>,
    pub server_state: Arc<ServerState>,
    pub config: ControllerConfig,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field("server_ready", &self.server_state.is_ready())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Initialize the operator runtime
///
/// # Errors
///
/// Returns an error if metrics cannot be registered, the HTTP clients cannot be
/// built or no Kubernetes configuration is available.
pub async fn initialize() -> Result<InitializationResult> {
    // Must happen before anything opens a TLS connection
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    let config = ControllerConfig::from_env();
    observability::logging::init_tracing(config.log_format, "email_operator=info");

    info!("Starting Email Operator");
    info!(
        "Build info: datetime={}, git_hash={}",
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );

    observability::metrics::register_metrics()?;

    let server_state = Arc::new(ServerState::default());
    let server_port = config.metrics_port;
    let server_state_clone = Arc::clone(&server_state);
    tokio::spawn(async move {
        if let Err(e) = start_server(server_port, server_state_clone).await {
            error!("HTTP server error: {}", e);
        }
    });

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;

    let store: Arc<dyn ObjectStore> = Arc::new(KubeStore::new(client.clone()));
    let dispatcher = Dispatcher::from_config(&config)?;
    info!("Provider dispatcher ready: {:?}", dispatcher);

    let reconciler = Arc::new(Reconciler::new(store, Arc::new(dispatcher)));

    Ok(InitializationResult {
        client,
        reconciler,
        server_state,
        config,
    })
}
