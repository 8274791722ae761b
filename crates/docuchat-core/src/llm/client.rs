//! AiClient trait definition.
//!
//! This is the only seam between the session and the generative backend.

use secrecy::SecretString;

use docuchat_types::llm::{GenerateRequest, GenerateResponse, LlmError};

/// Trait for generative backends (Gemini, test doubles, ...).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). The
/// credential is passed per call because the user may replace it at any
/// point during a session.
///
/// Implementations live in docuchat-infra (e.g., `GeminiClient`).
pub trait AiClient: Send + Sync {
    /// Human-readable backend name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Generate an answer to `request.prompt` grounded in `request.document`.
    fn generate(
        &self,
        credential: &SecretString,
        request: &GenerateRequest,
    ) -> impl std::future::Future<Output = Result<GenerateResponse, LlmError>> + Send;
}
