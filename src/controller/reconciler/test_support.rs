//! In-memory collaborators for reconciler unit tests.

use crate::controller::reconciler::store::{ObjectStore, StoreError};
use crate::controller::reconciler::types::{ObjectKey, Reconciler};
use crate::crd::{
    Email, EmailProvider, EmailSenderConfig, EmailSenderConfigSpec, EmailSenderConfigStatus,
    EmailSpec, EmailStatus,
};
use crate::provider::{Dispatcher, EmailTransport, OutboundEmail, ProviderError};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use kube::Resource;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn secret(namespace: &str, name: &str, entries: &[(&str, &str)]) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: Some(
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), ByteString(v.as_bytes().to_vec())))
                .collect::<BTreeMap<_, _>>(),
        ),
        ..Default::default()
    }
}

pub fn sender_config(
    namespace: &str,
    name: &str,
    provider: EmailProvider,
    secret_ref: &str,
    valid: bool,
) -> EmailSenderConfig {
    let mut config = EmailSenderConfig::new(
        name,
        EmailSenderConfigSpec {
            provider,
            api_token_secret_ref: secret_ref.to_string(),
            sender_email: "noreply@mg.example.com".to_string(),
        },
    );
    config.meta_mut().namespace = Some(namespace.to_string());
    if valid {
        config.status = Some(EmailSenderConfigStatus { valid: true });
    }
    config
}

pub fn email(namespace: &str, name: &str, sender_ref: &str, recipient: &str) -> Email {
    let mut email = Email::new(
        name,
        EmailSpec {
            sender_config_ref: sender_ref.to_string(),
            recipient_email: recipient.to_string(),
            subject: "Welcome".to_string(),
            body: "Thanks for signing up.".to_string(),
        },
    );
    email.meta_mut().namespace = Some(namespace.to_string());
    email
}

/// [`ObjectStore`] over hash maps, counting status writes
#[derive(Debug, Default)]
pub struct MemoryStore {
    emails: Mutex<HashMap<ObjectKey, Email>>,
    sender_configs: Mutex<HashMap<ObjectKey, EmailSenderConfig>>,
    secrets: Mutex<HashMap<ObjectKey, Secret>>,
    status_writes: AtomicUsize,
    fail_gets: AtomicBool,
    fail_status_writes: AtomicBool,
}

impl MemoryStore {
    pub fn insert_email(&self, email: Email) {
        let key = ObjectKey::from_resource(&email);
        self.emails.lock().unwrap().insert(key, email);
    }

    pub fn insert_sender_config(&self, config: EmailSenderConfig) {
        let key = ObjectKey::from_resource(&config);
        self.sender_configs.lock().unwrap().insert(key, config);
    }

    pub fn insert_secret(&self, secret: Secret) {
        let key = ObjectKey::new(
            secret.metadata.namespace.clone().unwrap_or_default(),
            secret.metadata.name.clone().unwrap_or_default(),
        );
        self.secrets.lock().unwrap().insert(key, secret);
    }

    pub fn email(&self, namespace: &str, name: &str) -> Email {
        self.emails.lock().unwrap()[&ObjectKey::new(namespace, name)].clone()
    }

    pub fn sender_config(&self, namespace: &str, name: &str) -> EmailSenderConfig {
        self.sender_configs.lock().unwrap()[&ObjectKey::new(namespace, name)].clone()
    }

    pub fn status_writes(&self) -> usize {
        self.status_writes.load(Ordering::SeqCst)
    }

    /// Make every get fail with a non-404 API error
    pub fn fail_gets(&self) {
        self.fail_gets.store(true, Ordering::SeqCst);
    }

    pub fn fail_status_writes(&self) {
        self.fail_status_writes.store(true, Ordering::SeqCst);
    }

    fn check_get(&self) -> Result<(), StoreError> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(infra_error());
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_status_writes.load(Ordering::SeqCst) {
            return Err(infra_error());
        }
        self.status_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn infra_error() -> StoreError {
    let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    StoreError::Api(kube::Error::SerdeError(cause))
}

fn lookup<K: Clone + Resource<DynamicType = ()>>(
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
impl ObjectStore for MemoryStore {
    async fn get_email(&self, key: &ObjectKey) -> Result<Email, StoreError> {
        self.check_get()?;
        lookup(&self.emails, key)
    }

    async fn get_sender_config(&self, key: &ObjectKey) -> Result<EmailSenderConfig, StoreError> {
        self.check_get()?;
        lookup(&self.sender_configs, key)
    }

    async fn get_secret(&self, key: &ObjectKey) -> Result<Secret, StoreError> {
        self.check_get()?;
        lookup(&self.secrets, key)
    }

    async fn update_email_status(
        &self,
        key: &ObjectKey,
        status: &EmailStatus,
    ) -> Result<(), StoreError> {
        self.check_write()?;
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
        self.check_write()?;
        let mut configs = self.sender_configs.lock().unwrap();
        let config = configs
            .get_mut(key)
            .ok_or_else(|| StoreError::not_found::<EmailSenderConfig>(&key.name))?;
        config.status = Some(status.clone());
        Ok(())
    }
}

/// A message as seen by [`FakeTransport`]
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub token: String,
}

#[derive(Debug)]
enum Behavior {
    Accept(String),
    Reject(String),
    Delay(Duration),
}

/// Recording [`EmailTransport`]
#[derive(Debug)]
pub struct FakeTransport {
    name: &'static str,
    behavior: Behavior,
    sent: Mutex<Vec<SentMessage>>,
    completed: AtomicUsize,
}

impl FakeTransport {
    fn with(name: &'static str, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            name,
            behavior,
            sent: Mutex::new(Vec::new()),
            completed: AtomicUsize::new(0),
        })
    }

    pub fn ok(name: &'static str, id: &str) -> Arc<Self> {
        Self::with(name, Behavior::Accept(id.to_string()))
    }

    pub fn rejecting(name: &'static str, message: &str) -> Arc<Self> {
        Self::with(name, Behavior::Reject(message.to_string()))
    }

    pub fn slow(name: &'static str, delay: Duration) -> Arc<Self> {
        Self::with(name, Behavior::Delay(delay))
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Sends that ran to the end, as opposed to being dropped mid-flight
    pub fn completions(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<SentMessage> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl EmailTransport for FakeTransport {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(
        &self,
        message: &OutboundEmail<'_>,
        api_token: &str,
    ) -> Result<String, ProviderError> {
        self.sent.lock().unwrap().push(SentMessage {
            sender: message.sender.to_string(),
            recipient: message.recipient.to_string(),
            subject: message.subject.to_string(),
            body: message.body.to_string(),
            token: api_token.to_string(),
        });
        let result = match &self.behavior {
            Behavior::Accept(id) => Ok(id.clone()),
            Behavior::Reject(message) => Err(ProviderError::Rejected {
                provider: self.name,
                message: message.clone(),
            }),
            Behavior::Delay(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("late".to_string())
            }
        };
        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}

/// Store, both fake transports and a context wired to them
#[derive(Debug)]
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub mailersend: Arc<FakeTransport>,
    pub mailgun: Arc<FakeTransport>,
    pub ctx: Arc<Reconciler>,
}

impl Harness {
    pub fn new(mailersend: Arc<FakeTransport>, mailgun: Arc<FakeTransport>) -> Self {
        let store = Arc::new(MemoryStore::default());
        let dispatcher = Dispatcher::new(
            Arc::clone(&mailersend) as Arc<dyn EmailTransport>,
            Arc::clone(&mailgun) as Arc<dyn EmailTransport>,
        );
        let ctx = Arc::new(Reconciler::new(
            Arc::clone(&store) as Arc<dyn ObjectStore>,
            Arc::new(dispatcher),
        ));
        Self {
            store,
            mailersend,
            mailgun,
            ctx,
        }
    }

    pub fn accepting() -> Self {
        Self::new(
            FakeTransport::ok("MailerSend", "ms-message-id"),
            FakeTransport::ok("Mailgun", "<mg-message-id@mg.example.com>"),
        )
    }

    pub fn total_calls(&self) -> usize {
        self.mailersend.calls() + self.mailgun.calls()
    }
}
