//! In-memory document store.
//!
//! Holds uploaded bytes keyed by handle until the session releases them.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use docuchat_core::document::store::DocumentStore;
use docuchat_types::document::{DocumentPayload, DocumentRef};
use docuchat_types::error::DocumentError;

#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: DashMap<Uuid, Arc<DocumentPayload>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn register(&self, payload: DocumentPayload) -> Result<DocumentRef, DocumentError> {
        let document = DocumentRef::new();
        self.documents.insert(document.0, Arc::new(payload));
        Ok(document)
    }

    async fn fetch(&self, document: &DocumentRef) -> Result<Arc<DocumentPayload>, DocumentError> {
        self.documents
            .get(&document.0)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| DocumentError::NotFound(document.clone()))
    }

    async fn release(&self, document: &DocumentRef) -> Result<(), DocumentError> {
        self.documents.remove(&document.0);
        Ok(())
    }
}
