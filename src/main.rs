//! # Email Operator
//!
//! A Kubernetes operator that delivers `Email` resources through MailerSend or
//! Mailgun.
//!
//! ## Overview
//!
//! 1. **Sender validation** - Each `EmailSenderConfig` is proven by sending one test
//!    message with its credentials; the outcome is recorded in `status.valid`
//! 2. **Delivery** - Each `Email` referencing a valid sender configuration is sent at
//!    most once; the outcome is recorded in `status.deliveryStatus`
//! 3. **Credentials** - API tokens are read from Secrets in the resource's namespace,
//!    falling back to `default`
//!
//! ## Features
//!
//! - **Multi-namespace**: Watches both resource kinds across all namespaces
//! - **Prometheus metrics**: Exposes metrics for monitoring and observability
//! - **Health probes**: HTTP endpoints for liveness and readiness checks

use anyhow::Result;
use email_operator::runtime::{initialize, run_controllers};

#[tokio::main]
async fn main() -> Result<()> {
    let init = initialize().await?;
    run_controllers(init.client, init.reconciler, init.server_state, &init.config).await
}
