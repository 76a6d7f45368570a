//! # Email
//!
//! A single outbound email request plus its delivery outcome.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Email Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: email.octopilot.io/v1
/// kind: Email
/// metadata:
///   name: order-1234-confirmation
///   namespace: shop
/// spec:
///   senderConfigRef: transactional
///   recipientEmail: customer@example.com
///   subject: Your order has shipped
///   body: Order 1234 is on its way.
/// ```
#[derive(CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    kind = "Email",
    group = "email.octopilot.io",
    version = "v1",
    namespaced,
    status = "EmailStatus",
    shortname = "em",
    printcolumn = r#"{"name":"Recipient", "type":"string", "jsonPath":".spec.recipientEmail"}, {"name":"Status", "type":"string", "jsonPath":".status.deliveryStatus"}, {"name":"Message ID", "type":"string", "jsonPath":".status.messageId"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct EmailSpec {
    /// Name of an EmailSenderConfig in the same namespace
    pub sender_config_ref: String,
    /// Recipient address
    pub recipient_email: String,
    pub subject: String,
    /// Plain text body
    pub body: String,
}

/// Delivery state of an Email
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum DeliveryState {
    /// Not attempted yet
    #[default]
    Pending,
    /// Accepted by the provider. Terminal.
    Sent,
    /// Last attempt failed. Retried on the next reconcile request.
    Failed,
}

impl fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeliveryState::Pending => "Pending",
            DeliveryState::Sent => "Sent",
            DeliveryState::Failed => "Failed",
        })
    }
}

/// Status of the Email resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailStatus {
    #[serde(default)]
    pub delivery_status: DeliveryState,
    /// Failure description, empty once sent
    #[serde(default)]
    pub error: String,
    /// Provider-assigned message identifier
    #[serde(default)]
    pub message_id: String,
    /// Time the provider accepted the message (RFC3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
}

impl Email {
    /// Current delivery state, `Pending` when no status was written yet
    #[must_use]
    pub fn delivery_state(&self) -> DeliveryState {
        self.status
            .as_ref()
            .map_or(DeliveryState::Pending, |s| s.delivery_status)
    }
}
