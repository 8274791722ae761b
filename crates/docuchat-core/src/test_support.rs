//! In-memory doubles for the core traits, shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Notify;

use docuchat_types::document::{DocumentPayload, DocumentRef};
use docuchat_types::error::{CredentialStoreError, DocumentError};
use docuchat_types::llm::{GenerateRequest, GenerateResponse, LlmError};

use crate::credential::store::CredentialStore;
use crate::document::store::DocumentStore;
use crate::llm::client::AiClient;

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

impl CredentialStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CredentialStoreError> {
        self.insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CredentialStoreError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

pub struct FailingCredentialStore;

impl CredentialStore for FailingCredentialStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CredentialStoreError> {
        Err(CredentialStoreError::Unavailable)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), CredentialStoreError> {
        Err(CredentialStoreError::Unavailable)
    }

    async fn remove(&self, _key: &str) -> Result<(), CredentialStoreError> {
        Err(CredentialStoreError::Unavailable)
    }
}

#[derive(Default)]
pub struct MemoryDocuments {
    documents: Mutex<HashMap<DocumentRef, Arc<DocumentPayload>>>,
    released: Mutex<Vec<DocumentRef>>,
}

impl MemoryDocuments {
    pub fn put(&self, payload: DocumentPayload) -> DocumentRef {
        let document = DocumentRef::new();
        self.documents
            .lock()
            .unwrap()
            .insert(document.clone(), Arc::new(payload));
        document
    }

    pub fn contains(&self, document: &DocumentRef) -> bool {
        self.documents.lock().unwrap().contains_key(document)
    }

    pub fn released(&self) -> Vec<DocumentRef> {
        self.released.lock().unwrap().clone()
    }
}

impl DocumentStore for MemoryDocuments {
    async fn register(&self, payload: DocumentPayload) -> Result<DocumentRef, DocumentError> {
        Ok(self.put(payload))
    }

    async fn fetch(&self, document: &DocumentRef) -> Result<Arc<DocumentPayload>, DocumentError> {
        self.documents
            .lock()
            .unwrap()
            .get(document)
            .cloned()
            .ok_or_else(|| DocumentError::NotFound(document.clone()))
    }

    async fn release(&self, document: &DocumentRef) -> Result<(), DocumentError> {
        if self.documents.lock().unwrap().remove(document).is_some() {
            self.released.lock().unwrap().push(document.clone());
        }
        Ok(())
    }
}

/// Backend double that replays queued results and records every call.
#[derive(Clone, Default)]
pub struct ScriptedClient {
    inner: Arc<ScriptedInner>,
}

#[derive(Default)]
struct ScriptedInner {
    results: Mutex<VecDeque<Result<GenerateResponse, LlmError>>>,
    requests: Mutex<Vec<(String, GenerateRequest)>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call waits for one `notify_one` on `gate` before answering.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            inner: Arc::new(ScriptedInner {
                gate: Some(gate),
                ..Default::default()
            }),
        }
    }

    pub fn respond(self, text: &str) -> Self {
        self.push(Ok(GenerateResponse::text(text)))
    }

    pub fn fail(self, error: LlmError) -> Self {
        self.push(Err(error))
    }

    fn push(self, result: Result<GenerateResponse, LlmError>) -> Self {
        self.inner.results.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// `(credential, request)` pairs in call order.
    pub fn requests(&self) -> Vec<(String, GenerateRequest)> {
        self.inner.requests.lock().unwrap().clone()
    }
}

impl AiClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        credential: &SecretString,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, LlmError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .requests
            .lock()
            .unwrap()
            .push((credential.expose_secret().to_string(), request.clone()));

        if let Some(gate) = &self.inner.gate {
            gate.notified().await;
        }

        self.inner
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse))
    }
}
