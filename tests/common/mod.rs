//! Common test utilities for integration tests
//!
//! Provides rustls initialization and an in-memory object store so the
//! reconcilers can be driven end to end without a cluster.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use async_trait::async_trait;
use email_operator::controller::reconciler::{ObjectKey, ObjectStore, StoreError};
use email_operator::crd::{
    Email, EmailProvider, EmailSenderConfig, EmailSenderConfigSpec, EmailSenderConfigStatus,
    EmailSpec, EmailStatus,
};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use kube::Resource;
use pact_consumer::prelude::ValidatingMockServer;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, Once};

static RUSTLS_INIT: Once = Once::new();

/// Initialize rustls crypto provider for tests
///
/// Uses a `Once` so it is only installed once per test binary.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        rustls::crypto::ring::default_provider()
            .install_default()
            .expect("Failed to install rustls crypto provider");
    });
}

/// Base URL of a Pact mock server without the trailing slash
pub fn mock_base_url(mock_server: &dyn ValidatingMockServer) -> String {
    let mut base_url = mock_server.url().to_string();
    if base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}

pub fn token_secret(namespace: &str, name: &str, token: &str) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            "apiToken".to_string(),
            ByteString(token.as_bytes().to_vec()),
        )])),
        ..Default::default()
    }
}

pub fn sender_config(
    namespace: &str,
    name: &str,
    provider: EmailProvider,
    sender: &str,
    secret_ref: &str,
    valid: bool,
) -> EmailSenderConfig {
    let mut config = EmailSenderConfig::new(
        name,
        EmailSenderConfigSpec {
            provider,
            api_token_secret_ref: secret_ref.to_string(),
            sender_email: sender.to_string(),
        },
    );
    config.meta_mut().namespace = Some(namespace.to_string());
    config.status = valid.then_some(EmailSenderConfigStatus { valid: true });
    config
}

pub fn email(namespace: &str, name: &str, sender_ref: &str, recipient: &str) -> Email {
    let mut email = Email::new(
        name,
        EmailSpec {
            sender_config_ref: sender_ref.to_string(),
            recipient_email: recipient.to_string(),
            subject: "Your order has shipped".to_string(),
            body: "Order 1234 is on its way.".to_string(),
        },
    );
    email.meta_mut().namespace = Some(namespace.to_string());
    email
}

/// Minimal in-memory [`ObjectStore`]
#[derive(Debug, Default)]
pub struct InMemoryStore {
    emails: Mutex<HashMap<ObjectKey, Email>>,
    sender_configs: Mutex<HashMap<ObjectKey, EmailSenderConfig>>,
    secrets: Mutex<HashMap<ObjectKey, Secret>>,
}

impl InMemoryStore {
    pub fn with_email(self, email: Email) -> Self {
        let key = ObjectKey::from_resource(&email);
        self.emails.lock().unwrap().insert(key, email);
        self
    }

    pub fn with_sender_config(self, config: EmailSenderConfig) -> Self {
        let key = ObjectKey::from_resource(&config);
        self.sender_configs.lock().unwrap().insert(key, config);
        self
    }

    pub fn with_secret(self, secret: Secret) -> Self {
        let key = ObjectKey::new(
            secret.metadata.namespace.clone().unwrap_or_default(),
            secret.metadata.name.clone().unwrap_or_default(),
        );
        self.secrets.lock().unwrap().insert(key, secret);
        self
    }

    pub fn email(&self, namespace: &str, name: &str) -> Email {
        self.emails.lock().unwrap()[&ObjectKey::new(namespace, name)].clone()
    }

    pub fn sender_config(&self, namespace: &str, name: &str) -> EmailSenderConfig {
        self.sender_configs.lock().unwrap()[&ObjectKey::new(namespace, name)].clone()
    }
}

fn get<K: Clone + Resource<DynamicType = ()>>(
    map: &Mutex<HashMap<ObjectKey, K>>,
    key: &ObjectKey,
) -> Result<K, StoreError> {
    map.lock()
        .unwrap()
        .get(key)
        .cloned()
        .ok_or_else(|| StoreError::not_found::<K>(&key.name))
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn get_email(&self, key: &ObjectKey) -> Result<Email, StoreError> {
        get(&self.emails, key)
    }

    async fn get_sender_config(&self, key: &ObjectKey) -> Result<EmailSenderConfig, StoreError> {
        get(&self.sender_configs, key)
    }

    async fn get_secret(&self, key: &ObjectKey) -> Result<Secret, StoreError> {
        get(&self.secrets, key)
    }

    async fn update_email_status(
        &self,
        key: &ObjectKey,
        status: &EmailStatus,
    ) -> Result<(), StoreError> {
        let mut emails = self.emails.lock().unwrap();
        let email = emails
            .get_mut(key)
            .ok_or_else(|| StoreError::not_found::<Email>(&key.name))?;
        email.status = Some(status.clone());
        Ok(())
    }

    async fn update_sender_config_status(
        &self,
        key: &ObjectKey,
        status: &EmailSenderConfigStatus,
    ) -> Result<(), StoreError> {
        let mut configs = self.sender_configs.lock().unwrap();
        let config = configs
            .get_mut(key)
            .ok_or_else(|| StoreError::not_found::<EmailSenderConfig>(&key.name))?;
        config.status = Some(status.clone());
        Ok(())
    }
}
