//! # Object Store
//!
//! The reconcilers' only view of the cluster: get-by-reference and status
//! subresource writes. [`KubeStore`] backs it with the Kubernetes API.

use crate::constants::FIELD_MANAGER;
use crate::controller::reconciler::types::ObjectKey;
use crate::crd::{Email, EmailSenderConfig, EmailSenderConfigStatus, EmailStatus};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The object does not exist
    #[error("{resource} \"{name}\" not found")]
    NotFound { resource: String, name: String },
    /// Any other API failure
    #[error(transparent)]
    Api(#[from] kube::Error),
}

impl StoreError {
    /// Not-found error for resource type `K`, worded like the API server's own message
    pub fn not_found<K: Resource<DynamicType = ()>>(name: &str) -> Self {
        StoreError::NotFound {
            resource: resource_label::<K>(),
            name: name.to_string(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// `plural.group`, or just `plural` for core resources
fn resource_label<K: Resource<DynamicType = ()>>() -> String {
    let plural = K::plural(&());
    let group = K::group(&());
    if group.is_empty() {
        plural.into_owned()
    } else {
        format!("{plural}.{group}")
    }
}

/// Store operations consumed by the reconcilers
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_email(&self, key: &ObjectKey) -> Result<Email, StoreError>;

    async fn get_sender_config(&self, key: &ObjectKey) -> Result<EmailSenderConfig, StoreError>;

    async fn get_secret(&self, key: &ObjectKey) -> Result<Secret, StoreError>;

    /// Persist only the status subresource of an Email
    async fn update_email_status(
        &self,
        key: &ObjectKey,
        status: &EmailStatus,
    ) -> Result<(), StoreError>;

    /// Persist only the status subresource of an EmailSenderConfig
    async fn update_sender_config_status(
        &self,
        key: &ObjectKey,
        status: &EmailSenderConfigStatus,
    ) -> Result<(), StoreError>;
}

/// [`ObjectStore`] backed by the Kubernetes API server
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl Debug for KubeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

impl KubeStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api<K>(&self, namespace: &str) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>,
    {
        Api::namespaced(self.client.clone(), namespace)
    }

    async fn get<K>(&self, key: &ObjectKey) -> Result<K, StoreError>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Debug,
    {
        self.api::<K>(&key.namespace)
            .get(&key.name)
            .await
            .map_err(|e| classify::<K>(e, &key.name))
    }

    async fn patch_status<K, S>(&self, key: &ObjectKey, status: &S) -> Result<(), StoreError>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Debug,
        S: Serialize + Sync,
    {
        let patch = serde_json::json!({ "status": status });
        self.api::<K>(&key.namespace)
            .patch_status(
                &key.name,
                &PatchParams::apply(FIELD_MANAGER),
                &Patch::Merge(patch),
            )
            .await
            .map_err(|e| classify::<K>(e, &key.name))?;
        Ok(())
    }
}

fn classify<K: Resource<DynamicType = ()>>(error: kube::Error, name: &str) -> StoreError {
    match error {
        kube::Error::Api(ref response) if response.code == 404 => StoreError::not_found::<K>(name),
        other => StoreError::Api(other),
    }
}

#[async_trait]
impl ObjectStore for KubeStore {
    async fn get_email(&self, key: &ObjectKey) -> Result<Email, StoreError> {
        self.get(key).await
    }

    async fn get_sender_config(&self, key: &ObjectKey) -> Result<EmailSenderConfig, StoreError> {
        self.get(key).await
    }

    async fn get_secret(&self, key: &ObjectKey) -> Result<Secret, StoreError> {
        self.get(key).await
    }

    async fn update_email_status(
        &self,
        key: &ObjectKey,
        status: &EmailStatus,
    ) -> Result<(), StoreError> {
        self.patch_status::<Email, _>(key, status).await
    }

    async fn update_sender_config_status(
        &self,
        key: &ObjectKey,
        status: &EmailSenderConfigStatus,
    ) -> Result<(), StoreError> {
        self.patch_status::<EmailSenderConfig, _>(key, status)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_for_custom_resource() {
        let err = StoreError::not_found::<EmailSenderConfig>("transactional");
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "emailsenderconfigs.email.octopilot.io \"transactional\" not found"
        );
    }

    #[test]
    fn test_not_found_message_for_core_resource() {
        let err = StoreError::not_found::<Secret>("mailgun-token");
        assert_eq!(err.to_string(), "secrets \"mailgun-token\" not found");
    }
}
