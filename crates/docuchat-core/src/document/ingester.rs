//! Document ingestion into the session.
//!
//! Every upload starts a fresh conversation: the previous document is
//! released and the message log is cleared before the new bytes are
//! registered.

use std::sync::Mutex;

use docuchat_types::document::{DocumentPayload, DocumentRef};
use docuchat_types::error::DocumentError;

use super::store::{DocumentStoreDyn, DynDocumentStore};
use crate::chat::state::{self, SessionState};

/// Loads documents into a session and tears them down on reset.
pub struct DocumentIngester {
    store: DynDocumentStore,
}

impl DocumentIngester {
    pub fn new(store: DynDocumentStore) -> Self {
        Self { store }
    }

    /// Reset the session, then register `payload` as its document.
    ///
    /// No size or type validation happens here; an unusable document
    /// surfaces later as an encoding or backend failure.
    pub async fn ingest(
        &self,
        session: &Mutex<SessionState>,
        payload: DocumentPayload,
    ) -> Result<DocumentRef, DocumentError> {
        self.reset(session).await;

        let file_name = payload.file_name.clone();
        let bytes = payload.len();
        let document = self.store.register_boxed(payload).await?;
        let displaced = state::lock(session).load_document(document.clone());
        // A concurrent ingest registered its document while ours was in flight.
        if let Some(previous) = displaced {
            self.release(&previous).await;
        }

        tracing::info!(%document, ?file_name, bytes, "document loaded");
        Ok(document)
    }

    /// Clear the document, messages, and staged prompt, releasing the
    /// previous document's bytes.
    pub async fn reset(&self, session: &Mutex<SessionState>) {
        let previous = state::lock(session).reset();

        if let Some(document) = previous {
            self.release(&document).await;
        }
    }

    async fn release(&self, document: &DocumentRef) {
        match self.store.release_boxed(document).await {
            Ok(()) => tracing::debug!(%document, "released document"),
            Err(e) => tracing::warn!(%document, error = %e, "failed to release document"),
        }
    }
}
