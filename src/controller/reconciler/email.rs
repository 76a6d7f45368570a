//! # Email Reconciliation
//!
//! Delivers an Email at most once. `Sent` is terminal and short-circuits
//! every later reconcile before any network call. Failures are written to
//! status and retried on the next reconcile request; they never fail the
//! reconcile itself.

use crate::controller::reconciler::status::update_email_status;
use crate::controller::reconciler::types::{ObjectKey, Reconciler, ReconcilerError};
use crate::crd::{DeliveryState, Email, EmailStatus};
use crate::observability::metrics;
use kube_runtime::controller::Action;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

const KIND: &str = "Email";

/// Reconcile entry point for Email resources
///
/// # Errors
///
/// Returns [`ReconcilerError`] only if the Email itself cannot be read.
pub async fn reconcile_email(
    email: Arc<Email>,
    ctx: Arc<Reconciler>,
) -> Result<Action, ReconcilerError> {
    let start = Instant::now();
    let key = ObjectKey::from_resource(email.as_ref());
    let span = info_span!(
        "reconcile",
        resource.kind = KIND,
        resource.name = %key.name,
        resource.namespace = %key.namespace
    );

    let result = deliver(&key, &ctx).instrument(span).await;

    metrics::increment_reconciliations(KIND);
    metrics::observe_reconciliation_duration(KIND, start.elapsed().as_secs_f64());
    result
}

async fn deliver(key: &ObjectKey, ctx: &Reconciler) -> Result<Action, ReconcilerError> {
    let email = match ctx.store.get_email(key).await {
        Ok(email) => email,
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

    if email.delivery_state() == DeliveryState::Sent {
        debug!("{} {} already sent", KIND, key);
        return Ok(Action::await_change());
    }

    if email.metadata.deletion_timestamp.is_some() {
        debug!("{} {} is being deleted", KIND, key);
        return Ok(Action::await_change());
    }

    let sender_key = ObjectKey::new(&key.namespace, &email.spec.sender_config_ref);
    let sender_config = match ctx.store.get_sender_config(&sender_key).await {
        Ok(config) => config,
        Err(e) => {
            mark_failed(ctx, &email, format!("unable to fetch EmailSenderConfig: {e}")).await;
            return Ok(Action::await_change());
        }
    };

    if !sender_config.is_valid() {
        mark_failed(
            ctx,
            &email,
            "failed to send email: the emailsenderconfig is not valid".to_string(),
        )
        .await;
        return Ok(Action::await_change());
    }

    let sent = ctx
        .dispatcher
        .send_email_message(
            ctx.store.as_ref(),
            &sender_config,
            &email.spec.recipient_email,
            &email.spec.subject,
            &email.spec.body,
        )
        .await;

    match sent {
        Ok(message_id) => {
            info!("{} {} sent (message id {:?})", KIND, key, message_id);
            metrics::increment_emails_sent();
            let status = EmailStatus {
                delivery_status: DeliveryState::Sent,
                error: String::new(),
                message_id,
                sent_at: Some(chrono::Utc::now().to_rfc3339()),
            };
            update_email_status(ctx.store.as_ref(), &email, status).await;
        }
        Err(e) => {
            mark_failed(ctx, &email, format!("failed to send email: {e}")).await;
        }
    }

    Ok(Action::await_change())
}

/// Record a failed attempt, keeping any previously stored message id
async fn mark_failed(ctx: &Reconciler, email: &Email, error: String) {
    warn!(
        "{} {} delivery failed: {}",
        KIND,
        ObjectKey::from_resource(email),
        error
    );
    metrics::increment_emails_failed();

    let current = email.status.clone().unwrap_or_default();
    let status = EmailStatus {
        delivery_status: DeliveryState::Failed,
        error,
        ..current
    };
    update_email_status(ctx.store.as_ref(), email, status).await;
}
