//! GeminiClient -- concrete [`AiClient`] implementation for Google Gemini.
//!
//! Sends one `generateContent` request per prompt, carrying the system
//! instructions, the document as inline base64 data, and the prompt text.
//!
//! The credential arrives per call as a [`SecretString`] and is only exposed
//! when building the `x-goog-api-key` header.

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use secrecy::{ExposeSecret, SecretString};

use docuchat_core::llm::client::AiClient;
use docuchat_types::config::ProviderSettings;
use docuchat_types::llm::{GenerateRequest, GenerateResponse, LlmError};

use super::types::{GeminiContent, GeminiErrorResponse, GeminiPart, GeminiRequest, GeminiResponse};

/// Google Gemini backend client.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Create a client using the base URL and timeout from `settings`.
    pub fn new(settings: &ProviderSettings) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    /// Convert a backend-agnostic [`GenerateRequest`] into a [`GeminiRequest`].
    fn to_gemini_request(request: &GenerateRequest) -> GeminiRequest {
        let system_instruction = (!request.system_instructions.is_empty()).then(|| GeminiContent {
            role: None,
            parts: vec![GeminiPart::text(&request.system_instructions)],
        });

        GeminiRequest {
            system_instruction,
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![
                    GeminiPart::inline(request.mime_type(), &request.document.data),
                    GeminiPart::text(&request.prompt),
                ],
            }],
        }
    }
}

/// Build the structured error for a non-success response.
///
/// The message comes from the JSON error envelope when there is one, and
/// from the raw body otherwise.
pub(crate) fn error_from_response(
    status: u16,
    retry_after: Option<&str>,
    body: &str,
) -> LlmError {
    let message = serde_json::from_str::<GeminiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match LlmError::from_status(status, message) {
        LlmError::RateLimited { .. } => LlmError::RateLimited {
            retry_after_ms: retry_after
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| secs.saturating_mul(1000)),
        },
        other => other,
    }
}

impl AiClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        credential: &SecretString,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, LlmError> {
        let body = Self::to_gemini_request(request);
        let url = self.url(&request.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", credential.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let error_body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "gemini returned an error status");
            return Err(error_from_response(
                status.as_u16(),
                retry_after.as_deref(),
                &error_body,
            ));
        }

        let gemini_resp: GeminiResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let Some(text) = gemini_resp.first_text() else {
            if let Some(reason) = gemini_resp
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
            {
                return Err(LlmError::Provider {
                    status: None,
                    message: format!("prompt blocked: {reason}"),
                });
            }
            return Err(LlmError::EmptyResponse);
        };

        Ok(GenerateResponse {
            text,
            model: gemini_resp.model_version,
            finish_reason: gemini_resp
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone()),
        })
    }
}
