//! # Error Policy
//!
//! Handling of reconciliation errors returned to the controller runtime.
//!
//! Reconcilers only return errors for infrastructure failures reading the
//! reconciled object itself. Those are retried after a fixed delay; every other
//! failure is already recorded in status.

use crate::controller::reconciler::ReconcilerError;
use crate::observability::metrics;
use kube::ResourceExt;
use kube_runtime::controller::Action;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Log the error, count it and schedule a retry after `requeue`
pub fn handle_reconciliation_error<K: ResourceExt>(
    kind: &str,
    obj: &Arc<K>,
    error: &ReconcilerError,
    requeue: Duration,
) -> Action {
    let name = obj.name_any();
    let namespace = obj.namespace().unwrap_or_default();

    let error_span = tracing::span!(
        tracing::Level::ERROR,
        "controller.reconciliation_error",
        resource.kind = kind,
        resource.name = %name,
        resource.namespace = %namespace,
        error = %error
    );
    let _error_guard = error_span.enter();

    error!("Reconciliation error for {} {}/{}: {}", kind, namespace, name, error);
    metrics::increment_reconciliation_errors(kind);

    info!("Retrying {} {}/{} in {}s", kind, namespace, name, requeue.as_secs());
    Action::requeue(requeue)
}
