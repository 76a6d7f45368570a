//! # Types
//!
//! Core types for the reconcilers.

use crate::controller::reconciler::store::{ObjectStore, StoreError};
use crate::provider::Dispatcher;
use kube::ResourceExt;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned to the controller runtime
///
/// Only infrastructure failures at the first fetch surface here; every other
/// failure is recorded in the object's status and the reconcile succeeds.
#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("unable to fetch {kind} {key}: {source}")]
    Fetch {
        kind: &'static str,
        key: ObjectKey,
        #[source]
        source: StoreError,
    },
}

/// Namespace/name reference to a namespaced object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Reference to an object as delivered by the watch
    pub fn from_resource<K: ResourceExt>(obj: &K) -> Self {
        Self::new(obj.namespace().unwrap_or_default(), obj.name_any())
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Shared reconciler context
///
/// Both capabilities are injected so reconcilers never reach for a global client.
#[derive(Clone)]
pub struct Reconciler {
    pub store: Arc<dyn ObjectStore>,
    pub dispatcher: Arc<Dispatcher>,
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    pub fn new(store: Arc<dyn ObjectStore>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { store, dispatcher }
    }
}
