//! # Watch Loop
//!
//! Runs one `kube_runtime::Controller` per custom resource kind until a
//! shutdown signal is received.

use crate::config::ControllerConfig;
use crate::controller::reconciler::{reconcile_email, reconcile_sender_config, Reconciler};
use crate::controller::server::ServerState;
use crate::crd::{Email, EmailSenderConfig};
use crate::runtime::error_policy::handle_reconciliation_error;
use futures::StreamExt;
use kube::api::Api;
use kube::Client;
use kube_runtime::{controller, watcher, Controller};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Watch both resource kinds across all namespaces and reconcile changes
///
/// Readiness is reported while the controllers run and withdrawn on shutdown.
///
/// # Errors
///
/// Currently infallible once started; the signature leaves room for startup checks.
pub async fn run_controllers(
    client: Client,
    reconciler: Arc<Reconciler>,
    server_state: Arc<ServerState>,
    config: &ControllerConfig,
) -> Result<(), anyhow::Error> {
    let requeue = config.reconciliation_error_requeue_duration();
    let runtime_config =
        controller::Config::default().concurrency(config.max_concurrent_reconciliations);

    let senders: Api<EmailSenderConfig> = Api::all(client.clone());
    let emails: Api<Email> = Api::all(client);

    info!(
        "Starting controllers (concurrency {}, error requeue {}s)",
        config.max_concurrent_reconciliations,
        requeue.as_secs()
    );

    let sender_controller = Controller::new(senders, watcher::Config::default().any_semantic())
        .with_config(runtime_config.clone())
        .shutdown_on_signal()
        .run(
            reconcile_sender_config,
            move |obj, error, _ctx| {
                handle_reconciliation_error("EmailSenderConfig", &obj, error, requeue)
            },
            Arc::clone(&reconciler),
        )
        .for_each(|result| {
            match result {
                Ok((obj, _)) => debug!("Reconciled EmailSenderConfig {}", obj),
                Err(e) => warn!("EmailSenderConfig controller error: {}", e),
            }
            futures::future::ready(())
        });

    let email_controller = Controller::new(emails, watcher::Config::default().any_semantic())
        .with_config(runtime_config)
        .shutdown_on_signal()
        .run(
            reconcile_email,
            move |obj, error, _ctx| handle_reconciliation_error("Email", &obj, error, requeue),
            reconciler,
        )
        .for_each(|result| {
            match result {
                Ok((obj, _)) => debug!("Reconciled Email {}", obj),
                Err(e) => warn!("Email controller error: {}", e),
            }
            futures::future::ready(())
        });

    server_state.set_ready(true);
    info!("Controllers running");

    futures::join!(sender_controller, email_controller);

    server_state.set_ready(false);
    info!("Controllers stopped, shutting down");
    Ok(())
}
