//! # Status Updates
//!
//! Writes a desired status only when it differs from the observed one.
//! Unchanged statuses are skipped so no redundant watch events are produced.
//! A failed write is logged and counted but never fails the reconcile.

use crate::controller::reconciler::store::{ObjectStore, StoreError};
use crate::controller::reconciler::types::ObjectKey;
use crate::crd::{Email, EmailSenderConfig, EmailSenderConfigStatus, EmailStatus};
use crate::observability::metrics;
use std::fmt::Debug;
use std::future::Future;
use tracing::{debug, warn};

/// Persist the status of an Email if it changed
///
/// Returns `true` when a write was issued and succeeded.
pub async fn update_email_status(
    store: &dyn ObjectStore,
    email: &Email,
    desired: EmailStatus,
) -> bool {
    let key = ObjectKey::from_resource(email);
    let (key_ref, desired_ref) = (&key, &desired);
    update_status_if_changed("Email", &key, email.status.as_ref(), &desired, move || {
        store.update_email_status(key_ref, desired_ref)
    })
    .await
}

/// Persist the status of an EmailSenderConfig if it changed
///
/// Returns `true` when a write was issued and succeeded.
pub async fn update_sender_config_status(
    store: &dyn ObjectStore,
    config: &EmailSenderConfig,
    desired: EmailSenderConfigStatus,
) -> bool {
    let key = ObjectKey::from_resource(config);
    let (key_ref, desired_ref) = (&key, &desired);
    update_status_if_changed(
        "EmailSenderConfig",
        &key,
        config.status.as_ref(),
        &desired,
        move || store.update_sender_config_status(key_ref, desired_ref),
    )
    .await
}

/// Compare `desired` against `current` (absent means the default status) and
/// call `write` only on a difference.
pub async fn update_status_if_changed<S, F, Fut>(
    kind: &str,
    key: &ObjectKey,
    current: Option<&S>,
    desired: &S,
    write: F,
) -> bool
where
    S: PartialEq + Default + Debug,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), StoreError>>,
{
    let unchanged = match current {
        Some(current) => current == desired,
        None => *desired == S::default(),
    };
    if unchanged {
        debug!("Skipping status update for {} {} - unchanged", kind, key);
        return false;
    }

    match write().await {
        Ok(()) => {
            debug!("Updated status for {} {}: {:?}", kind, key, desired);
            true
        }
        Err(e) => {
            warn!("Failed to update status for {} {}: {}", kind, key, e);
            metrics::increment_status_update_errors(kind);
            false
        }
    }
}
