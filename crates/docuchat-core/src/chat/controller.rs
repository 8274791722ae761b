//! Session controller for Docuchat.
//!
//! SessionController owns one conversation about one document. It admits
//! send requests, runs the send pipeline (encode, call backend, append the
//! answer or an advisory), and exposes read accessors for the UI layer.
//! Pipeline failures never propagate: each becomes exactly one AI message.

use std::sync::{Arc, Mutex};

use secrecy::SecretString;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info_span, warn};

use docuchat_types::chat::{Message, Sender, SessionSnapshot};
use docuchat_types::config::{ConcurrentSendPolicy, SessionConfig};
use docuchat_types::document::{DocumentPayload, DocumentRef};
use docuchat_types::error::DocumentError;
use docuchat_types::llm::GenerateRequest;

use super::failure::{FailureKind, PipelineError};
use super::state::{self, SessionState};
use crate::credential::manager::CredentialManager;
use crate::credential::store::DynCredentialStore;
use crate::document::encoder::DocumentEncoder;
use crate::document::ingester::DocumentIngester;
use crate::document::store::DynDocumentStore;
use crate::llm::box_client::BoxAiClient;

/// Result of asking the session to send a prompt.
///
/// Neither refusal is an error; the UI decides how to present them.
#[derive(Debug)]
pub enum SendDispatch<T> {
    /// The pipeline was admitted.
    Started(T),
    /// No document is loaded. The missing-document flag has been raised.
    MissingDocument,
    /// Another send is in flight and the policy rejects overlap.
    Busy,
}

impl<T> SendDispatch<T> {
    pub fn is_started(&self) -> bool {
        matches!(self, SendDispatch::Started(_))
    }
}

/// How a finished pipeline ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The backend answer was appended.
    Answered,
    /// An advisory for this failure was appended.
    Failed(FailureKind),
}

/// Handle to a spawned send pipeline.
pub struct SendHandle(JoinHandle<SendOutcome>);

impl SendHandle {
    /// Wait for the pipeline to finish.
    pub async fn wait(self) -> SendOutcome {
        match self.0.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "send pipeline task failed");
                SendOutcome::Failed(FailureKind::UnknownFailure)
            }
        }
    }
}

struct SessionInner {
    state: Mutex<SessionState>,
    credentials: CredentialManager,
    ingester: DocumentIngester,
    encoder: DocumentEncoder,
    client: BoxAiClient,
    config: SessionConfig,
}

/// Clears one pending mark when dropped.
///
/// Dropping happens on normal completion, on panic unwinding through the
/// pipeline, and when the spawned task is aborted.
struct PendingGuard {
    inner: Arc<SessionInner>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let mut state = state::lock(&self.inner.state);
        state.pending_sends = state.pending_sends.saturating_sub(1);
    }
}

/// The per-context chat session. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<SessionInner>,
}

impl SessionController {
    /// Build a session with an empty credential.
    pub fn new(
        config: SessionConfig,
        client: BoxAiClient,
        credential_store: DynCredentialStore,
        document_store: DynDocumentStore,
    ) -> Self {
        let credentials = CredentialManager::new(credential_store, config.credential_min_len);
        Self {
            inner: Arc::new(SessionInner {
                state: Mutex::new(SessionState::default()),
                credentials,
                ingester: DocumentIngester::new(document_store.clone()),
                encoder: DocumentEncoder::new(document_store),
                client,
                config,
            }),
        }
    }

    /// Build a session and restore any persisted credential.
    pub async fn start(
        config: SessionConfig,
        client: BoxAiClient,
        credential_store: DynCredentialStore,
        document_store: DynDocumentStore,
    ) -> Self {
        let controller = Self::new(config, client, credential_store, document_store);
        if controller.inner.credentials.restore().await {
            debug!("session started with restored credential");
        }
        controller
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn credentials(&self) -> &CredentialManager {
        &self.inner.credentials
    }

    pub async fn set_credential(&self, value: &str) {
        self.inner.credentials.set_credential(value).await;
    }

    pub async fn clear_credential(&self) {
        self.inner.credentials.clear_credential().await;
    }

    /// Start a new conversation about `payload`.
    pub async fn ingest(&self, payload: DocumentPayload) -> Result<DocumentRef, DocumentError> {
        self.inner.ingester.ingest(&self.inner.state, payload).await
    }

    /// Drop the document, the messages, and the staged prompt.
    ///
    /// A send already in flight still appends its answer afterwards.
    pub async fn reset(&self) {
        self.inner.ingester.reset(&self.inner.state).await;
    }

    /// Admit `prompt` and run its pipeline on a spawned task.
    ///
    /// The USER message is appended before this returns.
    pub fn request_send(&self, prompt: impl Into<String>) -> SendDispatch<SendHandle> {
        let prompt = prompt.into();
        match self.admit(&prompt) {
            SendDispatch::Started((guard, document)) => {
                let inner = self.inner.clone();
                let handle = tokio::spawn(run_pipeline(inner, guard, document, prompt));
                SendDispatch::Started(SendHandle(handle))
            }
            SendDispatch::MissingDocument => SendDispatch::MissingDocument,
            SendDispatch::Busy => SendDispatch::Busy,
        }
    }

    /// Like [`request_send`](Self::request_send), but runs the pipeline on
    /// the current task and resolves once the answer or advisory is appended.
    pub async fn send(&self, prompt: impl Into<String>) -> SendDispatch<SendOutcome> {
        let prompt = prompt.into();
        match self.admit(&prompt) {
            SendDispatch::Started((guard, document)) => {
                let inner = self.inner.clone();
                SendDispatch::Started(run_pipeline(inner, guard, document, prompt).await)
            }
            SendDispatch::MissingDocument => SendDispatch::MissingDocument,
            SendDispatch::Busy => SendDispatch::Busy,
        }
    }

    /// Clear the missing-document flag once the notice has been shown.
    pub fn acknowledge_missing_document(&self) {
        self.lock().missing_document = false;
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().log.messages().to_vec()
    }

    pub fn last_message(&self) -> Option<Message> {
        self.lock().log.last().cloned()
    }

    pub fn is_sending(&self) -> bool {
        self.lock().is_sending()
    }

    pub fn missing_document(&self) -> bool {
        self.lock().missing_document
    }

    pub fn has_document(&self) -> bool {
        self.lock().document.is_some()
    }

    pub fn document(&self) -> Option<DocumentRef> {
        self.lock().document.clone()
    }

    pub fn staged_prompt(&self) -> String {
        self.lock().staged_prompt.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    /// Decide whether `prompt` may be sent, and if so mark the send pending
    /// and append the USER message, all under one lock.
    fn admit(&self, prompt: &str) -> SendDispatch<(PendingGuard, DocumentRef)> {
        let mut state = self.lock();

        if state.is_sending()
            && self.inner.config.concurrent_sends == ConcurrentSendPolicy::RejectWhilePending
        {
            debug!("send rejected, another send is pending");
            return SendDispatch::Busy;
        }

        state.staged_prompt = prompt.to_string();

        let Some(document) = state.document.clone() else {
            debug!("send requested without a document");
            state.missing_document = true;
            return SendDispatch::MissingDocument;
        };

        state.pending_sends += 1;
        state.log.append(prompt, Sender::User);

        let guard = PendingGuard {
            inner: self.inner.clone(),
        };
        SendDispatch::Started((guard, document))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        state::lock(&self.inner.state)
    }
}

impl SessionInner {
    async fn generate(
        &self,
        document: &DocumentRef,
        prompt: String,
    ) -> Result<String, PipelineError> {
        let encoded = self.encoder.encode(document).await?;
        let request = GenerateRequest {
            model: self.config.model.clone(),
            system_instructions: self.config.system_instructions(),
            prompt,
            document: encoded,
        };
        let credential: SecretString = self.credentials.current();

        let response = self.client.generate(&credential, &request).await?;
        debug!(
            finish_reason = ?response.finish_reason,
            chars = response.text.len(),
            "answer received"
        );
        Ok(response.text)
    }
}

async fn run_pipeline(
    inner: Arc<SessionInner>,
    guard: PendingGuard,
    document: DocumentRef,
    prompt: String,
) -> SendOutcome {
    let _guard = guard;

    let span = info_span!(
        "gen_ai.generate",
        gen_ai.system = inner.client.name(),
        gen_ai.request.model = %inner.config.model,
        document = %document,
    );
    let result = inner.generate(&document, prompt).instrument(span).await;

    let (text, outcome) = match result {
        Ok(text) => (text, SendOutcome::Answered),
        Err(e) => {
            let kind = FailureKind::classify(&e);
            match kind {
                FailureKind::UnknownFailure => error!(error = %e, "send failed"),
                _ => warn!(error = %e, kind = ?kind, "send failed"),
            }
            (kind.advisory().to_string(), SendOutcome::Failed(kind))
        }
    };

    state::lock(&inner.state).log.append(text, Sender::Ai);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::manager::CREDENTIAL_KEY;
    use crate::test_support::{MemoryDocuments, MemoryStore, ScriptedClient};
    use docuchat_types::llm::LlmError;
    use std::time::Duration;
    use tokio::sync::Notify;

    const KEY: &str = "AIzaSyD-0123456789abcdefghijklmnopqrs";

    struct Fixture {
        controller: SessionController,
        client: ScriptedClient,
        documents: Arc<MemoryDocuments>,
        credentials: Arc<MemoryStore>,
    }

    fn fixture_with(client: ScriptedClient, config: SessionConfig) -> Fixture {
        let documents = Arc::new(MemoryDocuments::default());
        let credentials = Arc::new(MemoryStore::default());
        let controller = SessionController::new(
            config,
            BoxAiClient::new(client.clone()),
            credentials.clone(),
            documents.clone(),
        );
        Fixture {
            controller,
            client,
            documents,
            credentials,
        }
    }

    fn fixture(client: ScriptedClient) -> Fixture {
        fixture_with(client, SessionConfig::default())
    }

    fn pdf() -> DocumentPayload {
        DocumentPayload::pdf(b"%PDF-1.7 test".to_vec()).with_file_name("report.pdf")
    }

    fn entries(controller: &SessionController) -> Vec<(Sender, String)> {
        controller
            .messages()
            .into_iter()
            .map(|m| (m.sender, m.text))
            .collect()
    }

    async fn wait_until_called(client: &ScriptedClient, calls: usize) {
        for _ in 0..200 {
            if client.calls() >= calls {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("client was not called {calls} time(s)");
    }

    #[tokio::test]
    async fn test_summarize_scenario() {
        let f = fixture(ScriptedClient::new().respond("Summary text"));
        f.controller.set_credential(KEY).await;
        f.controller.ingest(pdf()).await.unwrap();

        let SendDispatch::Started(handle) = f.controller.request_send("Summarize") else {
            panic!("send was not started");
        };
        assert_eq!(handle.wait().await, SendOutcome::Answered);

        assert_eq!(
            entries(&f.controller),
            vec![
                (Sender::User, "Summarize".to_string()),
                (Sender::Ai, "Summary text".to_string()),
            ]
        );
        assert!(!f.controller.is_sending());
        assert_eq!(f.controller.staged_prompt(), "Summarize");
    }

    #[tokio::test]
    async fn test_request_carries_document_and_settings() {
        let f = fixture(ScriptedClient::new().respond("ok"));
        f.controller.set_credential(KEY).await;
        f.controller.ingest(pdf()).await.unwrap();

        f.controller.send("What is this?").await;

        let requests = f.client.requests();
        assert_eq!(requests.len(), 1);
        let (credential, request) = &requests[0];
        assert_eq!(credential, KEY);
        assert_eq!(request.prompt, "What is this?");
        assert_eq!(request.model, SessionConfig::default().model);
        assert_eq!(request.mime_type(), "application/pdf");
        assert_eq!(request.document.data, "JVBERi0xLjcgdGVzdA==");
        assert_eq!(
            request.system_instructions,
            SessionConfig::default().system_instructions()
        );
    }

    #[tokio::test]
    async fn test_send_without_document() {
        let f = fixture(ScriptedClient::new().respond("unused"));

        let dispatch = f.controller.send("hello").await;

        assert!(matches!(dispatch, SendDispatch::MissingDocument));
        assert!(f.controller.missing_document());
        assert!(f.controller.messages().is_empty());
        assert!(!f.controller.is_sending());
        assert_eq!(f.client.calls(), 0);
        assert_eq!(f.controller.staged_prompt(), "hello");
    }

    #[tokio::test]
    async fn test_missing_document_flag_cleared() {
        let f = fixture(ScriptedClient::new());
        assert!(matches!(
            f.controller.request_send("q"),
            SendDispatch::MissingDocument
        ));

        f.controller.acknowledge_missing_document();
        assert!(!f.controller.missing_document());

        f.controller.send("q").await;
        assert!(f.controller.missing_document());
        f.controller.ingest(pdf()).await.unwrap();
        assert!(!f.controller.missing_document());
    }

    #[tokio::test]
    async fn test_empty_prompt_is_sent() {
        let f = fixture(ScriptedClient::new().respond("An empty question"));
        f.controller.ingest(pdf()).await.unwrap();

        let dispatch = f.controller.send("").await;

        assert!(matches!(
            dispatch,
            SendDispatch::Started(SendOutcome::Answered)
        ));
        assert_eq!(entries(&f.controller)[0], (Sender::User, String::new()));
    }

    #[tokio::test]
    async fn test_overloaded_advisory() {
        let f = fixture(ScriptedClient::new().fail(LlmError::from_status(503, "overloaded")));
        f.controller.ingest(pdf()).await.unwrap();

        let dispatch = f.controller.send("Summarize").await;

        assert!(matches!(
            dispatch,
            SendDispatch::Started(SendOutcome::Failed(FailureKind::ServiceOverloaded))
        ));
        assert_eq!(
            entries(&f.controller),
            vec![
                (Sender::User, "Summarize".to_string()),
                (
                    Sender::Ai,
                    FailureKind::ServiceOverloaded.advisory().to_string()
                ),
            ]
        );
        assert!(!f.controller.is_sending());
    }

    #[tokio::test]
    async fn test_unauthorized_advisory() {
        for status in [400, 401] {
            let f = fixture(ScriptedClient::new().fail(LlmError::from_status(status, "bad key")));
            f.controller.ingest(pdf()).await.unwrap();

            f.controller.send("Summarize").await;

            let messages = f.controller.messages();
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[1].sender, Sender::Ai);
            assert_eq!(messages[1].text, FailureKind::Unauthorized.advisory());
            assert!(!f.controller.is_sending());
        }
    }

    #[tokio::test]
    async fn test_unknown_failure_advisory() {
        let f = fixture(ScriptedClient::new().fail(LlmError::Transport("reset".to_string())));
        f.controller.ingest(pdf()).await.unwrap();

        let dispatch = f.controller.send("Summarize").await;

        assert!(matches!(
            dispatch,
            SendDispatch::Started(SendOutcome::Failed(FailureKind::UnknownFailure))
        ));
        let last = f.controller.last_message().unwrap();
        assert_eq!(last.sender, Sender::Ai);
        assert_eq!(last.text, FailureKind::UnknownFailure.advisory());
    }

    #[tokio::test]
    async fn test_encoding_failure_skips_backend() {
        let f = fixture(ScriptedClient::new().respond("unused"));
        let document = f.controller.ingest(pdf()).await.unwrap();
        // Bytes vanish from under the session.
        crate::document::store::DocumentStore::release(f.documents.as_ref(), &document)
            .await
            .unwrap();

        let dispatch = f.controller.send("Summarize").await;

        assert!(matches!(
            dispatch,
            SendDispatch::Started(SendOutcome::Failed(FailureKind::EncodingFailure))
        ));
        assert_eq!(f.client.calls(), 0);
        assert_eq!(f.controller.messages().len(), 2);
        assert!(!f.controller.is_sending());
    }

    #[tokio::test]
    async fn test_pending_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let f = fixture(ScriptedClient::gated(gate.clone()).respond("done"));
        f.controller.ingest(pdf()).await.unwrap();
        assert!(!f.controller.is_sending());

        let SendDispatch::Started(handle) = f.controller.request_send("Summarize") else {
            panic!("send was not started");
        };
        assert!(f.controller.is_sending());
        assert!(f.controller.snapshot().pending_send);
        // USER entry is visible before the backend answers.
        assert_eq!(entries(&f.controller), vec![(Sender::User, "Summarize".to_string())]);

        wait_until_called(&f.client, 1).await;
        gate.notify_one();
        handle.wait().await;

        assert!(!f.controller.is_sending());
        assert_eq!(f.controller.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_sends_allowed_by_default() {
        let gate = Arc::new(Notify::new());
        let client = ScriptedClient::gated(gate.clone())
            .respond("first")
            .respond("second");
        let f = fixture(client);
        f.controller.ingest(pdf()).await.unwrap();

        let SendDispatch::Started(first) = f.controller.request_send("one") else {
            panic!("first send was not started");
        };
        let SendDispatch::Started(second) = f.controller.request_send("two") else {
            panic!("second send was not started");
        };
        wait_until_called(&f.client, 2).await;
        assert_eq!(f.controller.messages().len(), 2);

        // Release one pipeline; the session stays pending for the other.
        gate.notify_one();
        for _ in 0..200 {
            if f.controller.messages().len() == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(f.controller.messages().len(), 3);
        assert!(f.controller.is_sending());

        gate.notify_one();
        first.wait().await;
        second.wait().await;
        assert!(!f.controller.is_sending());
        assert_eq!(f.controller.messages().len(), 4);
    }

    #[tokio::test]
    async fn test_reject_while_pending() {
        let gate = Arc::new(Notify::new());
        let config = SessionConfig {
            concurrent_sends: ConcurrentSendPolicy::RejectWhilePending,
            ..Default::default()
        };
        let f = fixture_with(ScriptedClient::gated(gate.clone()).respond("done"), config);
        f.controller.ingest(pdf()).await.unwrap();

        let SendDispatch::Started(handle) = f.controller.request_send("one") else {
            panic!("send was not started");
        };
        let rejected = f.controller.request_send("two");

        assert!(matches!(rejected, SendDispatch::Busy));
        assert_eq!(f.controller.staged_prompt(), "one");
        assert_eq!(f.controller.messages().len(), 1);

        wait_until_called(&f.client, 1).await;
        gate.notify_one();
        handle.wait().await;
        assert_eq!(f.client.calls(), 1);
        assert!(f.controller.request_send("three").is_started());
    }

    #[tokio::test]
    async fn test_aborted_pipeline_clears_pending() {
        let gate = Arc::new(Notify::new());
        let f = fixture(ScriptedClient::gated(gate).respond("never"));
        f.controller.ingest(pdf()).await.unwrap();

        let SendDispatch::Started(handle) = f.controller.request_send("q") else {
            panic!("send was not started");
        };
        wait_until_called(&f.client, 1).await;
        handle.0.abort();

        assert_eq!(
            handle.wait().await,
            SendOutcome::Failed(FailureKind::UnknownFailure)
        );
        assert!(!f.controller.is_sending());
    }

    #[tokio::test]
    async fn test_ingest_starts_new_conversation() {
        let f = fixture(ScriptedClient::new().respond("answer"));
        let first = f.controller.ingest(pdf()).await.unwrap();
        f.controller.send("question").await;
        assert_eq!(f.controller.messages().len(), 2);

        let second = f.controller.ingest(pdf()).await.unwrap();

        assert!(f.controller.messages().is_empty());
        assert_eq!(f.controller.document(), Some(second));
        assert_eq!(f.documents.released(), vec![first]);
    }

    #[tokio::test]
    async fn test_reset() {
        let f = fixture(ScriptedClient::new().respond("answer"));
        f.controller.ingest(pdf()).await.unwrap();
        f.controller.send("question").await;

        f.controller.reset().await;

        let snapshot = f.controller.snapshot();
        assert!(snapshot.document.is_none());
        assert!(snapshot.messages.is_empty());
        assert!(snapshot.staged_prompt.is_empty());
        assert!(!f.controller.has_document());
    }

    #[tokio::test]
    async fn test_answer_after_reset_lands_in_fresh_log() {
        let gate = Arc::new(Notify::new());
        let f = fixture(ScriptedClient::gated(gate.clone()).respond("late answer"));
        let doc = f.controller.ingest(pdf()).await.unwrap();

        let SendDispatch::Started(handle) = f.controller.request_send("question") else {
            panic!("send was not started");
        };
        wait_until_called(&f.client, 1).await;

        f.controller.reset().await;
        assert!(f.controller.messages().is_empty());
        assert!(!f.controller.has_document());
        assert!(f.controller.is_sending());
        assert_eq!(f.documents.released(), vec![doc]);

        gate.notify_one();
        assert_eq!(handle.wait().await, SendOutcome::Answered);

        assert_eq!(
            entries(&f.controller),
            vec![(Sender::Ai, "late answer".to_string())]
        );
        assert!(!f.controller.is_sending());
    }

    #[tokio::test]
    async fn test_start_restores_credential() {
        let credentials = Arc::new(MemoryStore::default());
        credentials.insert(CREDENTIAL_KEY, KEY);
        let controller = SessionController::start(
            SessionConfig::default(),
            BoxAiClient::new(ScriptedClient::new()),
            credentials,
            Arc::new(MemoryDocuments::default()),
        )
        .await;

        assert!(controller.credentials().is_set());
    }

    #[tokio::test]
    async fn test_credential_persistence_through_controller() {
        let f = fixture(ScriptedClient::new());

        f.controller.set_credential("too-short").await;
        assert!(f.credentials.value(CREDENTIAL_KEY).is_none());

        f.controller.set_credential(KEY).await;
        assert_eq!(f.credentials.value(CREDENTIAL_KEY).as_deref(), Some(KEY));

        f.controller.clear_credential().await;
        assert!(f.credentials.value(CREDENTIAL_KEY).is_none());
        assert!(!f.controller.credentials().is_set());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let f = fixture(ScriptedClient::new().respond("answer"));
        let other = f.controller.clone();
        other.ingest(pdf()).await.unwrap();

        assert!(f.controller.has_document());
    }
}
