//! MailerSend REST client
//!
//! Sends through `POST /v1/email` with bearer authentication. A send is
//! accepted with `202 Accepted`; the message id is returned in the
//! `X-Message-Id` response header.
//!
//! References:
//! - [MailerSend Email API](https://developers.mailersend.com/api/v1/email.html)

use crate::constants::PROVIDER_TIMEOUT;
use crate::provider::{rejection_message, EmailTransport, OutboundEmail, ProviderError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

const PROVIDER: &str = "MailerSend";
const MESSAGE_ID_HEADER: &str = "X-Message-Id";
const RECIPIENT_NAME: &str = "Recipient";

#[derive(Debug, Serialize)]
struct Mailbox<'a> {
    email: &'a str,
    name: &'a str,
}

/// Request body for `POST /v1/email`
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: Mailbox<'a>,
    to: Vec<Mailbox<'a>>,
    subject: &'a str,
    text: &'a str,
}

impl<'a> From<&OutboundEmail<'a>> for SendEmailRequest<'a> {
    fn from(message: &OutboundEmail<'a>) -> Self {
        Self {
            // The sender address doubles as the display name.
            from: Mailbox {
                email: message.sender,
                name: message.sender,
            },
            to: vec![Mailbox {
                email: message.recipient,
                name: RECIPIENT_NAME,
            }],
            subject: message.subject,
            text: message.body,
        }
    }
}

/// MailerSend transport
#[derive(Debug, Clone)]
pub struct MailerSendClient {
    http_client: Client,
    base_url: String,
}

impl MailerSendClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .context("Failed to create MailerSend HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EmailTransport for MailerSendClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn send(
        &self,
        message: &OutboundEmail<'_>,
        api_token: &str,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/v1/email", self.base_url);
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_token)
            .json(&SendEmailRequest::from(message))
            .send()
            .await
            .map_err(|source| ProviderError::Http {
                provider: PROVIDER,
                source,
            })?;

        let status = response.status();
        if status != StatusCode::ACCEPTED {
            // Best effort; a body that cannot be read still leaves the status line.
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected {
                provider: PROVIDER,
                message: rejection_message(status, &text),
            });
        }

        // A missing header is accepted as an empty id.
        let id = response
            .headers()
            .get(MESSAGE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Ok(id)
    }
}
