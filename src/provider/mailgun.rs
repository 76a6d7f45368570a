//! Mailgun REST client
//!
//! Sends through `POST /v3/{domain}/messages` with HTTP basic auth
//! (`api:<token>`) and a form-encoded body. The sending domain is taken from
//! the sender address.
//!
//! References:
//! - [Mailgun Messages API](https://documentation.mailgun.com/docs/mailgun/api-reference/openapi-final/tag/Messages/)

use crate::constants::PROVIDER_TIMEOUT;
use crate::provider::{rejection_message, EmailTransport, OutboundEmail, ProviderError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const PROVIDER: &str = "Mailgun";
const BASIC_AUTH_USER: &str = "api";

/// Response from a successful `POST /v3/{domain}/messages`
#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    id: String,
}

/// Sending domain of `sender`, which must contain exactly one `@`
pub(crate) fn sender_domain(sender: &str) -> Result<&str, ProviderError> {
    let mut parts = sender.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(domain), None) => Ok(domain),
        _ => Err(ProviderError::InvalidSender),
    }
}

/// Mailgun transport
#[derive(Debug, Clone)]
pub struct MailgunClient {
    http_client: Client,
    base_url: String,
}

impl MailgunClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .context("Failed to create Mailgun HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EmailTransport for MailgunClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn send(
        &self,
        message: &OutboundEmail<'_>,
        api_token: &str,
    ) -> Result<String, ProviderError> {
        let domain = sender_domain(message.sender)?;
        let url = format!("{}/v3/{}/messages", self.base_url, domain);
        debug!("POST {}", url);

        let form = [
            ("from", message.sender),
            ("to", message.recipient),
            ("subject", message.subject),
            ("text", message.body),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(BASIC_AUTH_USER, Some(api_token))
            .form(&form)
            .send()
            .await
            .map_err(|source| ProviderError::Http {
                provider: PROVIDER,
                source,
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| ProviderError::Http {
            provider: PROVIDER,
            source,
        })?;

        if !status.is_success() {
            return Err(ProviderError::Rejected {
                provider: PROVIDER,
                message: rejection_message(status, &text),
            });
        }

        let parsed: SendMessageResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::InvalidResponse {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        Ok(parsed.id)
    }
}
