//! # emailctl
//!
//! Command-line interface for the email operator.
//!
//! ## Usage
//!
//! ```bash
//! # List sender configurations in all namespaces
//! emailctl list senders
//!
//! # Show delivery status of one Email
//! emailctl status email order-1234-confirmation --namespace shop
//!
//! # Ask the operator to look at a resource again
//! emailctl reconcile sender transactional --namespace shop
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kube::Client;

mod list;
mod reconcile;
mod status;

/// Email Operator CLI
#[derive(Parser)]
#[command(name = "emailctl")]
#[command(
    about = "Email Operator CLI",
    long_about = None,
    after_help = "\
Available resource types:
  sender (or 'senders', 'esc') - EmailSenderConfig resource
  email (or 'emails', 'em')    - Email resource

Examples:
  emailctl list senders
  emailctl status email welcome --namespace shop
  emailctl reconcile esc transactional
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Kubernetes namespace (list: all namespaces when omitted, otherwise `default`)
    #[arg(short, long, global = true)]
    namespace: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List resources of one type
    List {
        #[arg(value_enum, value_name = "RESOURCE_TYPE")]
        resource_type: ResourceType,
    },
    /// Show spec and status of a resource
    Status {
        #[arg(value_enum, value_name = "RESOURCE_TYPE")]
        resource_type: ResourceType,

        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Trigger reconciliation of a resource
    Reconcile {
        #[arg(value_enum, value_name = "RESOURCE_TYPE")]
        resource_type: ResourceType,

        #[arg(value_name = "NAME")]
        name: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum ResourceType {
    #[value(name = "sender", aliases = ["senders", "esc", "emailsenderconfig"])]
    Sender,
    #[value(name = "email", aliases = ["emails", "em"])]
    Email,
}

#[tokio::main]
async fn main() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emailctl=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client. Ensure kubeconfig is configured.")?;

    match cli.command {
        Commands::List { resource_type } => match resource_type {
            ResourceType::Sender => list::list_senders(client, cli.namespace).await,
            ResourceType::Email => list::list_emails(client, cli.namespace).await,
        },
        Commands::Status {
            resource_type,
            name,
        } => match resource_type {
            ResourceType::Sender => status::sender_status(client, &name, cli.namespace).await,
            ResourceType::Email => status::email_status(client, &name, cli.namespace).await,
        },
        Commands::Reconcile {
            resource_type,
            name,
        } => reconcile::reconcile_command(client, resource_type, &name, cli.namespace).await,
    }
}
