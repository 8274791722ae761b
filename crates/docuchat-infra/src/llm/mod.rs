//! Backend client implementations.
//!
//! Contains the concrete [`AiClient`](docuchat_core::llm::client::AiClient)
//! for Google Gemini, and a factory that builds the boxed client the
//! session controller holds.

pub mod gemini;

use docuchat_core::llm::box_client::BoxAiClient;
use docuchat_types::config::ProviderSettings;
use docuchat_types::llm::LlmError;

use self::gemini::GeminiClient;

/// Build the boxed backend client from provider settings.
pub fn create_client(settings: &ProviderSettings) -> Result<BoxAiClient, LlmError> {
    let client = GeminiClient::new(settings)?;
    Ok(BoxAiClient::new(client))
}
