//! # EmailSenderConfig
//!
//! Reusable outbound email credentials plus their proven-working status.

use crate::crd::EmailProvider;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// EmailSenderConfig Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: email.octopilot.io/v1
/// kind: EmailSenderConfig
/// metadata:
///   name: transactional
///   namespace: shop
/// spec:
///   provider: MailerSend
///   apiTokenSecretRef: mailersend-token
///   senderEmail: no-reply@shop.example.com
/// ```
#[derive(CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    kind = "EmailSenderConfig",
    group = "email.octopilot.io",
    version = "v1",
    namespaced,
    status = "EmailSenderConfigStatus",
    shortname = "esc",
    printcolumn = r#"{"name":"Provider", "type":"string", "jsonPath":".spec.provider"}, {"name":"Sender", "type":"string", "jsonPath":".spec.senderEmail"}, {"name":"Valid", "type":"boolean", "jsonPath":".status.valid"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct EmailSenderConfigSpec {
    /// Email vendor: `MailerSend` or `Mailgun`
    #[schemars(with = "String")]
    pub provider: EmailProvider,
    /// Name of the Secret holding the provider API token under the `apiToken` key.
    /// Looked up in this resource's namespace first, then in `default`.
    pub api_token_secret_ref: String,
    /// Sender address. For Mailgun the domain part is also the sending domain.
    pub sender_email: String,
}

/// Status of the EmailSenderConfig resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailSenderConfigStatus {
    /// Whether a test message was successfully dispatched with the current spec
    #[serde(default)]
    pub valid: bool,
}

impl EmailSenderConfig {
    /// Whether the configuration has been proven to work
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.valid)
    }
}
