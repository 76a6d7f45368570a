//! # Metrics
//!
//! Prometheus metrics for monitoring the operator.
//!
//! ## Metrics Exposed
//!
//! - `email_operator_reconciliations_total{kind}` - Total number of reconciliations
//! - `email_operator_reconciliation_errors_total{kind}` - Reconciliations that returned an error
//! - `email_operator_reconciliation_duration_seconds{kind}` - Duration of reconciliations
//! - `email_operator_emails_sent_total` - Emails accepted by a provider
//! - `email_operator_emails_failed_total` - Email delivery attempts that ended in `Failed`
//! - `email_operator_sender_validations_total{outcome}` - Sender configuration validations
//! - `email_operator_provider_operations_total{provider}` - Provider send calls
//! - `email_operator_provider_operation_errors_total{provider}` - Failed provider send calls
//! - `email_operator_provider_operation_duration_seconds{provider}` - Duration of provider calls
//! - `email_operator_status_update_errors_total{kind}` - Status writes that failed and were dropped

use anyhow::Result;
use prometheus::core::Collector;
use prometheus::{HistogramVec, IntCounter, IntCounterVec, Registry};
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static RECONCILIATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "email_operator_reconciliations_total",
            "Total number of reconciliations by resource kind",
        ),
        &["kind"],
    )
    .expect("Failed to create RECONCILIATIONS_TOTAL metric - this should never happen")
});

static RECONCILIATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "email_operator_reconciliation_errors_total",
            "Total number of reconciliation errors by resource kind",
        ),
        &["kind"],
    )
    .expect("Failed to create RECONCILIATION_ERRORS_TOTAL metric - this should never happen")
});

static RECONCILIATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "email_operator_reconciliation_duration_seconds",
            "Duration of reconciliation in seconds by resource kind",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]),
        &["kind"],
    )
    .expect("Failed to create RECONCILIATION_DURATION metric - this should never happen")
});

static EMAILS_SENT_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "email_operator_emails_sent_total",
        "Total number of emails accepted by a provider",
    )
    .expect("Failed to create EMAILS_SENT_TOTAL metric - this should never happen")
});

static EMAILS_FAILED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "email_operator_emails_failed_total",
        "Total number of email delivery attempts that failed",
    )
    .expect("Failed to create EMAILS_FAILED_TOTAL metric - this should never happen")
});

static SENDER_VALIDATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "email_operator_sender_validations_total",
            "Total number of sender configuration validations by outcome",
        ),
        &["outcome"],
    )
    .expect("Failed to create SENDER_VALIDATIONS_TOTAL metric - this should never happen")
});

static PROVIDER_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "email_operator_provider_operations_total",
            "Total number of provider send operations by provider",
        ),
        &["provider"],
    )
    .expect("Failed to create PROVIDER_OPERATIONS_TOTAL metric - this should never happen")
});

static PROVIDER_OPERATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "email_operator_provider_operation_errors_total",
            "Total number of failed provider send operations by provider",
        ),
        &["provider"],
    )
    .expect("Failed to create PROVIDER_OPERATION_ERRORS_TOTAL metric - this should never happen")
});

static PROVIDER_OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "email_operator_provider_operation_duration_seconds",
            "Duration of provider send operations in seconds by provider",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["provider"],
    )
    .expect("Failed to create PROVIDER_OPERATION_DURATION metric - this should never happen")
});

static STATUS_UPDATE_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "email_operator_status_update_errors_total",
            "Total number of status updates that failed and were dropped, by resource kind",
        ),
        &["kind"],
    )
    .expect("Failed to create STATUS_UPDATE_ERRORS_TOTAL metric - this should never happen")
});

/// Register all metrics with the operator registry
///
/// Safe to call more than once; collectors that are already registered are skipped.
///
/// # Errors
///
/// Returns an error if a collector conflicts with an existing one.
pub fn register_metrics() -> Result<()> {
    register(RECONCILIATIONS_TOTAL.clone())?;
    register(RECONCILIATION_ERRORS_TOTAL.clone())?;
    register(RECONCILIATION_DURATION.clone())?;
    register(EMAILS_SENT_TOTAL.clone())?;
    register(EMAILS_FAILED_TOTAL.clone())?;
    register(SENDER_VALIDATIONS_TOTAL.clone())?;
    register(PROVIDER_OPERATIONS_TOTAL.clone())?;
    register(PROVIDER_OPERATION_ERRORS_TOTAL.clone())?;
    register(PROVIDER_OPERATION_DURATION.clone())?;
    register(STATUS_UPDATE_ERRORS_TOTAL.clone())?;
    Ok(())
}

fn register<C: Collector + 'static>(collector: C) -> Result<()> {
    match REGISTRY.register(Box::new(collector)) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

pub fn increment_reconciliations(kind: &str) {
    RECONCILIATIONS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn increment_reconciliation_errors(kind: &str) {
    RECONCILIATION_ERRORS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn observe_reconciliation_duration(kind: &str, duration: f64) {
    RECONCILIATION_DURATION
        .with_label_values(&[kind])
        .observe(duration);
}

pub fn increment_emails_sent() {
    EMAILS_SENT_TOTAL.inc();
}

pub fn increment_emails_failed() {
    EMAILS_FAILED_TOTAL.inc();
}

/// Record the outcome of a sender configuration validation (`valid` / `invalid`)
pub fn record_sender_validation(valid: bool) {
    let outcome = if valid { "valid" } else { "invalid" };
    SENDER_VALIDATIONS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_provider_operation(provider: &str, duration: f64) {
    PROVIDER_OPERATIONS_TOTAL.with_label_values(&[provider]).inc();
    PROVIDER_OPERATION_DURATION
        .with_label_values(&[provider])
        .observe(duration);
}

pub fn increment_provider_operation_errors(provider: &str) {
    PROVIDER_OPERATION_ERRORS_TOTAL
        .with_label_values(&[provider])
        .inc();
}

pub fn increment_status_update_errors(kind: &str) {
    STATUS_UPDATE_ERRORS_TOTAL.with_label_values(&[kind]).inc();
}

/// Current value of the dropped status update counter for `kind`
#[must_use]
pub fn status_update_errors(kind: &str) -> u64 {
    STATUS_UPDATE_ERRORS_TOTAL.with_label_values(&[kind]).get()
}
