//! # Controller Configuration
//!
//! Operator-level settings loaded from environment variables.

use crate::constants::{
    DEFAULT_MAILERSEND_API_URL, DEFAULT_MAILGUN_API_URL, DEFAULT_MAX_CONCURRENT_RECONCILIATIONS,
    DEFAULT_METRICS_PORT, DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS,
};
use std::time::Duration;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Operator-level configuration
///
/// All settings have defaults and can be overridden via environment variables,
/// typically populated from a ConfigMap with `envFrom` in the deployment.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Port of the metrics/probe HTTP server
    pub metrics_port: u16,
    /// How long to wait before retrying a reconcile that failed on infrastructure errors
    pub reconciliation_error_requeue_secs: u64,
    /// Maximum concurrent reconciliations per controller
    pub max_concurrent_reconciliations: u16,
    /// Log format (json, text)
    pub log_format: LogFormat,
    /// Base URL of the MailerSend API
    pub mailersend_api_url: String,
    /// Base URL of the Mailgun API (EU accounts use `https://api.eu.mailgun.net`)
    pub mailgun_api_url: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            metrics_port: DEFAULT_METRICS_PORT,
            reconciliation_error_requeue_secs: DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS,
            max_concurrent_reconciliations: DEFAULT_MAX_CONCURRENT_RECONCILIATIONS,
            log_format: LogFormat::Text,
            mailersend_api_url: DEFAULT_MAILERSEND_API_URL.to_string(),
            mailgun_api_url: DEFAULT_MAILGUN_API_URL.to_string(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Unparseable values fall back to the default for that key.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let log_format = match lookup("LOG_FORMAT").map(|v| v.to_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            Some(_) | None => defaults.log_format,
        };

        Self {
            metrics_port: parsed_or(&lookup, "METRICS_PORT", defaults.metrics_port),
            reconciliation_error_requeue_secs: parsed_or(
                &lookup,
                "RECONCILIATION_ERROR_REQUEUE_SECS",
                defaults.reconciliation_error_requeue_secs,
            ),
            max_concurrent_reconciliations: parsed_or(
                &lookup,
                "MAX_CONCURRENT_RECONCILIATIONS",
                defaults.max_concurrent_reconciliations,
            ),
            log_format,
            mailersend_api_url: lookup("MAILERSEND_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.mailersend_api_url),
            mailgun_api_url: lookup("MAILGUN_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.mailgun_api_url),
        }
    }

    /// Get reconciliation error requeue duration
    #[must_use]
    pub fn reconciliation_error_requeue_duration(&self) -> Duration {
        Duration::from_secs(self.reconciliation_error_requeue_secs)
    }
}

fn parsed_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
