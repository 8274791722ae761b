//! Request/response types for the generative backend.
//!
//! These model the single call the session makes: one document, one prompt,
//! fixed system instructions, one text answer back. Errors are structured so
//! callers classify them by variant and status code, never by message text.

use serde::{Deserialize, Serialize};

use crate::document::EncodedDocument;

/// Everything the backend needs to answer one question about one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub system_instructions: String,
    pub prompt: String,
    pub document: EncodedDocument,
}

impl GenerateRequest {
    pub fn mime_type(&self) -> &str {
        &self.document.mime_type
    }
}

/// Generated answer from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl GenerateResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
            finish_reason: None,
        }
    }
}

/// Errors from backend operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error (status {status:?}): {message}")]
    Provider { status: Option<u16>, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed (status {status})")]
    AuthenticationFailed { status: u16 },

    #[error("response contained no text")]
    EmptyResponse,
}

impl LlmError {
    /// Map a non-success HTTP status and its body to a structured error.
    ///
    /// The backend answers an invalid key with 400 as often as with 401, so
    /// both count as an authentication failure.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            400 | 401 => LlmError::AuthenticationFailed { status },
            429 => LlmError::RateLimited {
                retry_after_ms: None,
            },
            503 => LlmError::Overloaded(body),
            _ => LlmError::Provider {
                status: Some(status),
                message: body,
            },
        }
    }

    /// The HTTP status behind this error, if one is known.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Provider { status, .. } => *status,
            LlmError::RateLimited { .. } => Some(429),
            LlmError::Overloaded(_) => Some(503),
            LlmError::AuthenticationFailed { status } => Some(*status),
            _ => None,
        }
    }
}
