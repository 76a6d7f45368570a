//! # Prelude
//!
//! Re-exports commonly used types and traits for convenience.
//!
//! ```rust
//! use email_operator::prelude::*;
//! ```

// CRD types
pub use crate::crd::*;

// Provider seam
pub use crate::provider::{
    DispatchError, Dispatcher, EmailTransport, OutboundEmail, ProviderError,
};

// Reconciler types
pub use crate::controller::reconciler::{
    reconcile_email, reconcile_sender_config, KubeStore, ObjectKey, ObjectStore, Reconciler,
    ReconcilerError, StoreError,
};

// Configuration
pub use crate::config::{ControllerConfig, LogFormat};
