//! # EmailSenderConfig Reconciliation
//!
//! Proves a sender configuration works by sending one fixed test message
//! through its provider. `status.valid` records the outcome; once valid the
//! configuration is never re-tested until its status is reset.

use crate::constants::{VALIDATION_BODY, VALIDATION_RECIPIENT, VALIDATION_SUBJECT};
use crate::controller::reconciler::status::update_sender_config_status;
use crate::controller::reconciler::types::{ObjectKey, Reconciler, ReconcilerError};
use crate::crd::{EmailSenderConfig, EmailSenderConfigStatus};
use crate::observability::metrics;
use kube_runtime::controller::Action;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

const KIND: &str = "EmailSenderConfig";

/// Reconcile entry point for EmailSenderConfig resources
///
/// # Errors
///
/// Returns [`ReconcilerError`] only if the configuration itself cannot be read.
pub async fn reconcile_sender_config(
    config: Arc<EmailSenderConfig>,
    ctx: Arc<Reconciler>,
) -> Result<Action, ReconcilerError> {
    let start = Instant::now();
    let key = ObjectKey::from_resource(config.as_ref());
    let span = info_span!(
        "reconcile",
        resource.kind = KIND,
        resource.name = %key.name,
        resource.namespace = %key.namespace
    );

    let result = validate(&key, &ctx).instrument(span).await;

    metrics::increment_reconciliations(KIND);
    metrics::observe_reconciliation_duration(KIND, start.elapsed().as_secs_f64());
    result
}

async fn validate(key: &ObjectKey, ctx: &Reconciler) -> Result<Action, ReconcilerError> {
    let config = match ctx.store.get_sender_config(key).await {
        Ok(config) => config,
        Err(e) if e.is_not_found() => {
            debug!("{} {} no longer exists", KIND, key);
            return Ok(Action::await_change());
        }
        Err(source) => {
            return Err(ReconcilerError::Fetch {
                kind: KIND,
                key: key.clone(),
                source,
            })
        }
    };

    if config.is_valid() {
        debug!("{} {} already validated", KIND, key);
        return Ok(Action::await_change());
    }

    info!("Validating {} {} with a test message", KIND, key);
    let valid = match ctx
        .dispatcher
        .send_email_message(
            ctx.store.as_ref(),
            &config,
            VALIDATION_RECIPIENT,
            VALIDATION_SUBJECT,
            VALIDATION_BODY,
        )
        .await
    {
        Ok(message_id) => {
            info!("{} {} is valid (message id {:?})", KIND, key, message_id);
            true
        }
        Err(e) => {
            warn!("{} {} is not valid: {}", KIND, key, e);
            false
        }
    };

    metrics::record_sender_validation(valid);
    update_sender_config_status(ctx.store.as_ref(), &config, EmailSenderConfigStatus { valid })
        .await;

    Ok(Action::await_change())
}
