//! # Email Provider
//!
//! Closed set of outbound email vendors a sender configuration can target.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Outbound email vendor
///
/// Deserialized leniently: any tag other than `MailerSend` resolves to
/// [`EmailProvider::Mailgun`] so configurations written against older schemas
/// keep dispatching. Unrecognized tags are logged when they are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmailProvider {
    /// MailerSend REST API (`POST /v1/email`)
    MailerSend,
    /// Mailgun REST API (`POST /v3/{domain}/messages`)
    Mailgun,
}

impl EmailProvider {
    /// Tag as it appears in the resource spec
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailProvider::MailerSend => "MailerSend",
            EmailProvider::Mailgun => "Mailgun",
        }
    }

    /// Label used for metrics and log fields
    #[must_use]
    pub fn metric_label(&self) -> &'static str {
        match self {
            EmailProvider::MailerSend => "mailersend",
            EmailProvider::Mailgun => "mailgun",
        }
    }

    /// Strict lookup of a spec tag
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "MailerSend" => Some(EmailProvider::MailerSend),
            "Mailgun" => Some(EmailProvider::Mailgun),
            _ => None,
        }
    }
}

impl From<String> for EmailProvider {
    fn from(tag: String) -> Self {
        // Runs on every watch event and every read of the object.
        EmailProvider::from_tag(&tag).unwrap_or_else(|| {
            debug!(
                provider = %tag,
                "Unrecognized email provider, falling back to {}",
                EmailProvider::Mailgun
            );
            EmailProvider::Mailgun
        })
    }
}

impl From<EmailProvider> for String {
    fn from(provider: EmailProvider) -> Self {
        provider.as_str().to_string()
    }
}

impl fmt::Display for EmailProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
