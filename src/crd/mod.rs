//! # Custom Resource Definitions
//!
//! CRD types for the email operator.
//!
//! ## Module Structure
//!
//! - `sender_config.rs` - `EmailSenderConfig`: provider, credential reference and sender address
//! - `email.rs` - `Email`: a single message and its delivery outcome
//! - `provider.rs` - Closed set of supported email vendors

mod email;
mod provider;
mod sender_config;

pub use email::{DeliveryState, Email, EmailSpec, EmailStatus};
pub use provider::EmailProvider;
pub use sender_config::{EmailSenderConfig, EmailSenderConfigSpec, EmailSenderConfigStatus};
