//! # Credentials
//!
//! Resolves provider API tokens from Kubernetes Secrets.
//!
//! The Secret is looked up in the requesting object's namespace first. If that
//! lookup fails for any reason the shared `default` namespace is tried, and
//! only the second failure is reported.

use crate::constants::FALLBACK_SECRET_NAMESPACE;
use crate::controller::reconciler::store::{ObjectStore, StoreError};
use crate::controller::reconciler::types::ObjectKey;
use k8s_openapi::api::core::v1::Secret;
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("unable to fetch secret {name}: {source}")]
    Fetch {
        name: String,
        #[source]
        source: StoreError,
    },
    #[error("secret {name} does not contain key {key}")]
    MissingKey { name: String, key: String },
}

/// Read `key` from Secret `name`, preferring `namespace` over `default`
///
/// The value is decoded as UTF-8 (invalid sequences replaced) and wiped from
/// memory when dropped.
pub async fn resolve_secret_value(
    store: &dyn ObjectStore,
    namespace: &str,
    name: &str,
    key: &str,
) -> Result<Zeroizing<String>, CredentialError> {
    let secret = fetch_with_fallback(store, namespace, name).await?;

    let bytes = secret
        .data
        .as_ref()
        .and_then(|data| data.get(key))
        .ok_or_else(|| CredentialError::MissingKey {
            name: name.to_string(),
            key: key.to_string(),
        })?;

    Ok(Zeroizing::new(
        String::from_utf8_lossy(&bytes.0).into_owned(),
    ))
}

async fn fetch_with_fallback(
    store: &dyn ObjectStore,
    namespace: &str,
    name: &str,
) -> Result<Secret, CredentialError> {
    match store.get_secret(&ObjectKey::new(namespace, name)).await {
        Ok(secret) => Ok(secret),
        Err(e) => {
            debug!(
                "Secret {}/{} unavailable ({}), falling back to namespace {}",
                namespace, name, e, FALLBACK_SECRET_NAMESPACE
            );
            store
                .get_secret(&ObjectKey::new(FALLBACK_SECRET_NAMESPACE, name))
                .await
                .map_err(|source| CredentialError::Fetch {
                    name: name.to_string(),
                    source,
                })
        }
    }
}
