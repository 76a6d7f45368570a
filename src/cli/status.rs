//! # Status Command
//!
//! Detailed view of a single EmailSenderConfig or Email.

use anyhow::{Context, Result};
use email_operator::crd::{DeliveryState, Email, EmailSenderConfig};
use kube::api::ObjectMeta;
use kube::{api::Api, Client};

fn print_metadata(metadata: &ObjectMeta) {
    println!("Resource Information:");
    println!(
        "  Name: {}",
        metadata.name.as_deref().unwrap_or("<unknown>")
    );
    println!(
        "  Namespace: {}",
        metadata.namespace.as_deref().unwrap_or("<unknown>")
    );
    if let Some(uid) = &metadata.uid {
        println!("  UID: {uid}");
    }
}

/// Show spec and status of an EmailSenderConfig
pub async fn sender_status(client: Client, name: &str, namespace: Option<String>) -> Result<()> {
    let ns = namespace.as_deref().unwrap_or("default");
    let api: Api<EmailSenderConfig> = Api::namespaced(client, ns);

    let config = api
        .get(name)
        .await
        .with_context(|| format!("Failed to get EmailSenderConfig '{ns}/{name}'"))?;

    println!("Status for EmailSenderConfig '{ns}/{name}'");
    println!();
    print_metadata(&config.metadata);

    println!();
    println!("Spec:");
    println!("  Provider: {}", config.spec.provider);
    println!("  Sender: {}", config.spec.sender_email);
    println!("  API Token Secret: {}", config.spec.api_token_secret_ref);

    println!();
    println!("Status:");
    if config.is_valid() {
        println!("  Valid: True");
    } else {
        println!("  Valid: False");
        println!("  The operator re-validates only when it receives a reconcile request.");
        println!("  Fix the credentials, then run: emailctl reconcile sender {name} -n {ns}");
    }

    Ok(())
}

/// Show spec and delivery status of an Email
pub async fn email_status(client: Client, name: &str, namespace: Option<String>) -> Result<()> {
    let ns = namespace.as_deref().unwrap_or("default");
    let api: Api<Email> = Api::namespaced(client, ns);

    let email = api
        .get(name)
        .await
        .with_context(|| format!("Failed to get Email '{ns}/{name}'"))?;

    println!("Status for Email '{ns}/{name}'");
    println!();
    print_metadata(&email.metadata);

    println!();
    println!("Spec:");
    println!("  Sender Config: {}", email.spec.sender_config_ref);
    println!("  Recipient: {}", email.spec.recipient_email);
    println!("  Subject: {}", email.spec.subject);

    println!();
    println!("Status:");
    println!("  Delivery: {}", email.delivery_state());
    if let Some(status) = &email.status {
        if !status.message_id.is_empty() {
            println!("  Message ID: {}", status.message_id);
        }
        if let Some(sent_at) = &status.sent_at {
            println!("  Sent At: {sent_at}");
        }
        if !status.error.is_empty() {
            println!("  Error: {}", status.error);
        }
    }
    if email.delivery_state() == DeliveryState::Failed {
        println!();
        println!("  Retry with: emailctl reconcile email {name} -n {ns}");
    }

    Ok(())
}
