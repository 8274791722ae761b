//! Mutable state of one document chat session.

use std::sync::{Mutex, MutexGuard};

use docuchat_types::chat::SessionSnapshot;
use docuchat_types::document::DocumentRef;

use super::log::MessageLog;

/// Everything the session mutates.
///
/// Always accessed through a `std::sync::Mutex`; the lock is never held
/// across an `.await`.
#[derive(Debug, Default)]
pub struct SessionState {
    pub(crate) document: Option<DocumentRef>,
    pub(crate) log: MessageLog,
    pub(crate) staged_prompt: String,
    pub(crate) missing_document: bool,
    /// Number of send pipelines currently running.
    pub(crate) pending_sends: usize,
}

impl SessionState {
    /// Clear the document, messages, and staged prompt.
    ///
    /// Returns the previous document so the caller can release it.
    pub(crate) fn reset(&mut self) -> Option<DocumentRef> {
        self.staged_prompt.clear();
        self.log.clear();
        self.document.take()
    }

    /// Install a freshly registered document.
    ///
    /// Returns the document it displaced, if another ingest got there first.
    pub(crate) fn load_document(&mut self, document: DocumentRef) -> Option<DocumentRef> {
        self.missing_document = false;
        self.document.replace(document)
    }

    pub fn is_sending(&self) -> bool {
        self.pending_sends > 0
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            document: self.document.clone(),
            messages: self.log.messages().to_vec(),
            pending_send: self.is_sending(),
            missing_document: self.missing_document,
            staged_prompt: self.staged_prompt.clone(),
        }
    }
}

/// Lock session state, recovering from poisoning.
///
/// State transitions are single assignments, so a panic elsewhere cannot
/// leave the state half-updated.
pub(crate) fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docuchat_types::chat::Sender;

    #[test]
    fn test_reset_returns_previous_document() {
        let mut state = SessionState::default();
        let doc = DocumentRef::new();
        assert_eq!(state.load_document(doc.clone()), None);
        state.log.append("hi", Sender::User);
        state.staged_prompt = "hi".to_string();

        assert_eq!(state.reset(), Some(doc));
        assert!(state.document.is_none());
        assert!(state.log.is_empty());
        assert!(state.staged_prompt.is_empty());
        assert_eq!(state.reset(), None);
    }

    #[test]
    fn test_load_document_clears_missing_flag() {
        let mut state = SessionState {
            missing_document: true,
            ..Default::default()
        };
        state.load_document(DocumentRef::new());
        assert!(!state.missing_document);
    }

    #[test]
    fn test_snapshot() {
        let mut state = SessionState::default();
        state.pending_sends = 1;
        state.log.append("q", Sender::User);

        let snapshot = state.snapshot();
        assert!(snapshot.pending_send);
        assert_eq!(snapshot.messages.len(), 1);
        assert!(snapshot.document.is_none());
    }
}
