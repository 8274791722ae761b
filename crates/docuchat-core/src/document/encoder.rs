//! Base64 transport encoding of the loaded document.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use docuchat_types::document::{DocumentRef, EncodedDocument};
use docuchat_types::error::DocumentError;

use super::store::{DocumentStoreDyn, DynDocumentStore};

/// Turns a document handle into the base64 payload the backend expects.
///
/// Nothing is cached: every send re-reads and re-encodes the bytes.
pub struct DocumentEncoder {
    store: DynDocumentStore,
}

impl DocumentEncoder {
    pub fn new(store: DynDocumentStore) -> Self {
        Self { store }
    }

    /// Fetch and encode the referenced document.
    ///
    /// Fails if the handle no longer resolves (released or never registered)
    /// or the store cannot read it.
    pub async fn encode(&self, document: &DocumentRef) -> Result<EncodedDocument, DocumentError> {
        let payload = self.store.fetch_boxed(document).await?;
        tracing::debug!(%document, bytes = payload.len(), "encoding document");

        Ok(EncodedDocument {
            mime_type: payload.mime_type.clone(),
            data: STANDARD.encode(&payload.bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::store::DocumentStore;
    use crate::test_support::MemoryDocuments;
    use docuchat_types::document::DocumentPayload;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_encode_registered_document() {
        let store = Arc::new(MemoryDocuments::default());
        let doc = store.put(DocumentPayload::pdf(b"%PDF-1.7".to_vec()));
        let encoder = DocumentEncoder::new(store);

        let encoded = encoder.encode(&doc).await.unwrap();
        assert_eq!(encoded.mime_type, "application/pdf");
        assert_eq!(encoded.data, "JVBERi0xLjc=");
    }

    #[tokio::test]
    async fn test_encode_preserves_mime_type() {
        let store = Arc::new(MemoryDocuments::default());
        let doc = store.put(DocumentPayload::new(b"hello".to_vec(), "text/plain"));
        let encoder = DocumentEncoder::new(store);

        let encoded = encoder.encode(&doc).await.unwrap();
        assert_eq!(encoded.mime_type, "text/plain");
        assert_eq!(encoded.data, "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_encode_unknown_reference_fails() {
        let store = Arc::new(MemoryDocuments::default());
        let encoder = DocumentEncoder::new(store);

        let result = encoder.encode(&DocumentRef::new()).await;
        assert!(matches!(result, Err(DocumentError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_encode_after_release_fails() {
        let store = Arc::new(MemoryDocuments::default());
        let doc = store.put(DocumentPayload::pdf(vec![0u8; 4]));
        store.release(&doc).await.unwrap();
        let encoder = DocumentEncoder::new(store);

        assert!(encoder.encode(&doc).await.is_err());
    }
}
