//! # Constants
//!
//! Shared constants used throughout the operator.
//!
//! Values that operators may want to tune are also exposed through
//! [`crate::config::ControllerConfig`]. The provider timeout, the credential
//! fallback namespace and the validation message are fixed.

use std::time::Duration;

/// API group of the operator's custom resources
pub const API_GROUP: &str = "email.octopilot.io";

/// Field manager name used for status patches
pub const FIELD_MANAGER: &str = "email-operator";

/// Annotation bumped by `emailctl reconcile` to re-deliver a reconcile request
pub const RECONCILE_ANNOTATION: &str = "email.octopilot.io/reconcile";

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Default requeue interval for infrastructure reconciliation errors (seconds)
pub const DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS: u64 = 60;

/// Default number of reconciliations the runtime may run at once per controller
pub const DEFAULT_MAX_CONCURRENT_RECONCILIATIONS: u16 = 10;

/// Upper bound for a single provider call, measured from call start
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Namespace consulted when the credential secret is absent from the config's namespace
pub const FALLBACK_SECRET_NAMESPACE: &str = "default";

/// Key holding the provider API token inside the credential secret
pub const API_TOKEN_SECRET_KEY: &str = "apiToken";

/// Recipient of the message sent to prove a sender configuration works
pub const VALIDATION_RECIPIENT: &str = "sender-validation@example.com";

/// Subject of the validation message
pub const VALIDATION_SUBJECT: &str = "Test Email";

/// Body of the validation message
pub const VALIDATION_BODY: &str = "This is a test email to verify the EmailSenderConfig.";

/// Public MailerSend API endpoint
pub const DEFAULT_MAILERSEND_API_URL: &str = "https://api.mailersend.com";

/// Public Mailgun API endpoint (US region)
pub const DEFAULT_MAILGUN_API_URL: &str = "https://api.mailgun.net";
