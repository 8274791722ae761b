//! Classification of send pipeline failures into user-facing advisories.
//!
//! Classification is driven by error variants and HTTP status codes only.

use docuchat_types::error::DocumentError;
use docuchat_types::llm::LlmError;

/// Anything that can go wrong between appending the user's prompt and
/// appending the answer.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("document encoding failed: {0}")]
    Encoding(#[from] DocumentError),

    #[error("backend call failed: {0}")]
    Backend(#[from] LlmError),
}

/// How a failed send is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The document bytes could not be read or encoded.
    EncodingFailure,
    /// Backend reported transient overload (503).
    ServiceOverloaded,
    /// Backend rejected the credential (400/401).
    Unauthorized,
    /// Anything else.
    UnknownFailure,
}

impl FailureKind {
    pub fn classify(error: &PipelineError) -> Self {
        match error {
            PipelineError::Encoding(_) => FailureKind::EncodingFailure,
            PipelineError::Backend(err) => match err.status() {
                Some(503) => FailureKind::ServiceOverloaded,
                Some(400 | 401) => FailureKind::Unauthorized,
                _ => FailureKind::UnknownFailure,
            },
        }
    }

    /// Text of the AI-sender message appended for this failure.
    pub fn advisory(&self) -> &'static str {
        match self {
            FailureKind::ServiceOverloaded => {
                "⚠️ The model is overloaded, please try again later ⚠️"
            }
            FailureKind::Unauthorized => {
                "⚠️ Unauthorized. Check your API key and reset it ⚠️"
            }
            FailureKind::EncodingFailure | FailureKind::UnknownFailure => {
                "⚠️ Error while sending the message ⚠️"
            }
        }
    }
}
