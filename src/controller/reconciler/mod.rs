//! # Reconciler
//!
//! Convergence logic for EmailSenderConfig and Email resources.
//!
//! - `sender_config`: validates provider credentials with a test send
//! - `email`: delivers each Email at most once
//! - `credentials`: API token lookup with namespace fallback
//! - `status`: diff-before-write status persistence
//! - `store`: the object store seam used by all of the above

pub mod credentials;
pub mod email;
pub mod sender_config;
pub mod status;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use email::reconcile_email;
pub use sender_config::reconcile_sender_config;
pub use store::{KubeStore, ObjectStore, StoreError};
pub use types::{ObjectKey, Reconciler, ReconcilerError};
