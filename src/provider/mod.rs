//! # Provider Modules
//!
//! Outbound email providers and the dispatch layer in front of them.
//!
//! Each provider implements [`EmailTransport`], translating an [`OutboundEmail`]
//! into one vendor API call. [`Dispatcher`] validates the recipient, resolves
//! the API token, picks the transport named by the sender configuration and
//! bounds the call with a timeout.

use crate::config::ControllerConfig;
use crate::constants::{API_TOKEN_SECRET_KEY, PROVIDER_TIMEOUT};
use crate::controller::reconciler::credentials::{resolve_secret_value, CredentialError};
use crate::controller::reconciler::store::ObjectStore;
use crate::controller::reconciler::validation::is_valid_email;
use crate::crd::{EmailProvider, EmailSenderConfig};
use crate::observability::metrics;
use anyhow::Result;
use async_trait::async_trait;
use kube::ResourceExt;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info_span, warn, Instrument};

pub mod mailersend;
pub mod mailgun;

pub use mailersend::MailerSendClient;
pub use mailgun::MailgunClient;

/// One message as handed to a provider
#[derive(Debug, Clone, Copy)]
pub struct OutboundEmail<'a> {
    pub sender: &'a str,
    pub recipient: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
}

/// Provider-level failures
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Sender address cannot be split into local part and domain
    #[error("invalid sender email format")]
    InvalidSender,
    /// The provider answered with a non-success status
    #[error("error response from {provider}: {message}")]
    Rejected {
        provider: &'static str,
        message: String,
    },
    /// The provider answered with a success status but an unreadable body
    #[error("invalid response from {provider}: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },
    #[error("request to {provider} timed out after {}s", .timeout.as_secs())]
    Timeout {
        provider: &'static str,
        timeout: Duration,
    },
    #[error("request to {provider} failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Status line plus the provider's own explanation, if it gave one
///
/// JSON error bodies (`{"message": ...}`) are reduced to their message; any
/// other body is kept as text.
pub(crate) fn rejection_message(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string());

    if detail.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {detail}")
    }
}

/// Send-side contract of an email provider
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Vendor name used in error messages and logs
    fn name(&self) -> &'static str;

    /// Submit one message, returning the provider-assigned message id
    async fn send(
        &self,
        message: &OutboundEmail<'_>,
        api_token: &str,
    ) -> Result<String, ProviderError>;
}

/// Dispatch failures, worded as they appear in object status
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("email must be a valid email address")]
    InvalidRecipient,
    #[error("failed to retrieve API token: {0}")]
    Credential(#[from] CredentialError),
    #[error("failed to send email: {0}")]
    Provider(#[from] ProviderError),
}

/// Routes messages to the transport selected by an EmailSenderConfig
#[derive(Clone)]
pub struct Dispatcher {
    mailersend: Arc<dyn EmailTransport>,
    mailgun: Arc<dyn EmailTransport>,
    timeout: Duration,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("mailersend", &self.mailersend.name())
            .field("mailgun", &self.mailgun.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Dispatcher {
    pub fn new(mailersend: Arc<dyn EmailTransport>, mailgun: Arc<dyn EmailTransport>) -> Self {
        Self {
            mailersend,
            mailgun,
            timeout: PROVIDER_TIMEOUT,
        }
    }

    /// Override the per-call timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// HTTP transports pointed at the configured API endpoints
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: &ControllerConfig) -> Result<Self> {
        let mailersend = MailerSendClient::new(&config.mailersend_api_url)?;
        let mailgun = MailgunClient::new(&config.mailgun_api_url)?;
        Ok(Self::new(Arc::new(mailersend), Arc::new(mailgun)))
    }

    fn transport(&self, provider: EmailProvider) -> &dyn EmailTransport {
        match provider {
            EmailProvider::MailerSend => self.mailersend.as_ref(),
            EmailProvider::Mailgun => self.mailgun.as_ref(),
        }
    }

    /// Send one message using `sender_config`'s provider and credentials
    ///
    /// The API token is resolved from the sender configuration's namespace with
    /// fallback to `default`. Only the provider call is time-boxed.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] whose display text is recorded verbatim in status.
    pub async fn send_email_message(
        &self,
        store: &dyn ObjectStore,
        sender_config: &EmailSenderConfig,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, DispatchError> {
        if !is_valid_email(recipient) {
            return Err(DispatchError::InvalidRecipient);
        }

        let namespace = sender_config.namespace().unwrap_or_default();
        let api_token = resolve_secret_value(
            store,
            &namespace,
            &sender_config.spec.api_token_secret_ref,
            API_TOKEN_SECRET_KEY,
        )
        .await?;

        let provider = sender_config.spec.provider;
        let transport = self.transport(provider);
        let message = OutboundEmail {
            sender: &sender_config.spec.sender_email,
            recipient,
            subject,
            body,
        };

        let span = info_span!(
            "provider.send",
            provider = provider.metric_label(),
            sender = %message.sender
        );
        let start = Instant::now();
        let result = tokio::time::timeout(self.timeout, transport.send(&message, api_token.as_str()))
            .instrument(span)
            .await
            .unwrap_or_else(|_| {
                Err(ProviderError::Timeout {
                    provider: transport.name(),
                    timeout: self.timeout,
                })
            });
        metrics::record_provider_operation(provider.metric_label(), start.elapsed().as_secs_f64());

        match result {
            Ok(id) => {
                debug!("{} accepted message {:?}", transport.name(), id);
                Ok(id)
            }
            Err(e) => {
                warn!("{} send failed: {}", transport.name(), e);
                metrics::increment_provider_operation_errors(provider.metric_label());
                Err(e.into())
            }
        }
    }
}
