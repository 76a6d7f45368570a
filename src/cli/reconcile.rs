//! # Reconcile Command
//!
//! Triggers reconciliation by bumping an annotation. The operator watches all
//! changes, including metadata, so the patch re-delivers a reconcile request.

use crate::ResourceType;
use anyhow::{Context, Result};
use email_operator::constants::RECONCILE_ANNOTATION;
use email_operator::crd::{DeliveryState, Email, EmailSenderConfig};
use kube::api::{Api, Patch, PatchParams};
use kube::Client;
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};

/// Add or update the reconcile annotation on a resource
pub async fn reconcile_command(
    client: Client,
    resource_type: ResourceType,
    name: &str,
    namespace: Option<String>,
) -> Result<()> {
    let ns = namespace.as_deref().unwrap_or("default");

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System time is before UNIX epoch - this should never happen")?
        .as_secs();

    let patch = json!({
        "metadata": {
            "annotations": {
                RECONCILE_ANNOTATION: timestamp.to_string()
            }
        }
    });
    let params = PatchParams::default();

    let kind = match resource_type {
        ResourceType::Sender => {
            let api: Api<EmailSenderConfig> = Api::namespaced(client, ns);
            let config = api
                .get(name)
                .await
                .with_context(|| format!("Failed to get EmailSenderConfig '{ns}/{name}'"))?;
            if config.is_valid() {
                println!("   Note: configuration is already valid and will not be re-tested.");
            }
            api.patch(name, &params, &Patch::Merge(&patch))
                .await
                .with_context(|| {
                    format!("Failed to trigger reconciliation for EmailSenderConfig '{ns}/{name}'")
                })?;
            "EmailSenderConfig"
        }
        ResourceType::Email => {
            let api: Api<Email> = Api::namespaced(client, ns);
            let email = api
                .get(name)
                .await
                .with_context(|| format!("Failed to get Email '{ns}/{name}'"))?;
            if email.delivery_state() == DeliveryState::Sent {
                println!("   Note: Email was already sent and will not be sent again.");
            }
            api.patch(name, &params, &Patch::Merge(&patch))
                .await
                .with_context(|| {
                    format!("Failed to trigger reconciliation for Email '{ns}/{name}'")
                })?;
            "Email"
        }
    };

    println!("Reconciliation triggered for {kind} '{ns}/{name}'");
    println!("   Annotation: {RECONCILE_ANNOTATION}={timestamp}");

    Ok(())
}
