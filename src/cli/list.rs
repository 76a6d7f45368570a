//! # List Command
//!
//! Tabular listing of EmailSenderConfig and Email resources.

use anyhow::{Context, Result};
use email_operator::crd::{Email, EmailSenderConfig};
use kube::api::{Api, ListParams};
use kube::Client;

fn scoped_api<K>(client: Client, namespace: Option<&str>, kind: &str) -> Api<K>
where
    K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope, DynamicType = ()>,
{
    if let Some(ns) = namespace {
        println!("Listing {kind} resources in namespace '{ns}'...");
        Api::namespaced(client, ns)
    } else {
        println!("Listing {kind} resources in all namespaces...");
        Api::all(client)
    }
}

/// List EmailSenderConfig resources
pub async fn list_senders(client: Client, namespace: Option<String>) -> Result<()> {
    let api: Api<EmailSenderConfig> =
        scoped_api(client, namespace.as_deref(), "EmailSenderConfig");

    let configs = api
        .list(&ListParams::default())
        .await
        .context("Failed to list EmailSenderConfig resources")?;

    if configs.items.is_empty() {
        println!("No EmailSenderConfig resources found.");
        return Ok(());
    }

    println!(
        "\n{:<30} {:<20} {:<12} {:<35} {:<8}",
        "NAME", "NAMESPACE", "PROVIDER", "SENDER", "VALID"
    );
    println!("{}", "-".repeat(108));

    for config in configs.items {
        let name = config.metadata.name.as_deref().unwrap_or("<unknown>");
        let ns = config.metadata.namespace.as_deref().unwrap_or("<unknown>");
        let provider = config.spec.provider.as_str();
        let sender = &config.spec.sender_email;
        let valid = if config.is_valid() { "True" } else { "False" };

        println!("{name:<30} {ns:<20} {provider:<12} {sender:<35} {valid:<8}");
    }

    Ok(())
}

/// List Email resources
pub async fn list_emails(client: Client, namespace: Option<String>) -> Result<()> {
    let api: Api<Email> = scoped_api(client, namespace.as_deref(), "Email");

    let emails = api
        .list(&ListParams::default())
        .await
        .context("Failed to list Email resources")?;

    if emails.items.is_empty() {
        println!("No Email resources found.");
        return Ok(());
    }

    println!(
        "\n{:<30} {:<20} {:<35} {:<10} {:<30}",
        "NAME", "NAMESPACE", "RECIPIENT", "STATUS", "MESSAGE ID"
    );
    println!("{}", "-".repeat(129));

    for email in emails.items {
        let name = email.metadata.name.as_deref().unwrap_or("<unknown>");
        let ns = email.metadata.namespace.as_deref().unwrap_or("<unknown>");
        let recipient = &email.spec.recipient_email;
        let state = email.delivery_state().to_string();
        let message_id = email
            .status
            .as_ref()
            .map(|s| s.message_id.as_str())
            .filter(|id| !id.is_empty())
            .unwrap_or("-");

        println!("{name:<30} {ns:<20} {recipient:<35} {state:<10} {message_id:<30}");
    }

    Ok(())
}
