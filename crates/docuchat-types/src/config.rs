//! Global configuration types for Docuchat.
//!
//! `GlobalConfig` represents the top-level `config.toml`: backend connection
//! settings and the session behaviour. All fields have sensible defaults.

use serde::{Deserialize, Serialize};

/// Default backend model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Credentials shorter than this (after trimming) are never persisted.
pub const DEFAULT_CREDENTIAL_MIN_LEN: usize = 30;

/// Instructions that keep answers grounded in the uploaded document.
pub const GROUNDING_INSTRUCTIONS: &str = "\
1. If the user makes no specific request, extract the most important concepts by summarizing the document's content.
2. Do not make anything up: answer only from the document.";

/// Appended when the front-end renders answers as HTML.
pub const HTML_ANSWER_INSTRUCTIONS: &str = "\
3. Format the answer as HTML and apply Tailwind CSS classes to emphasize the most important content (text must stay white/light). Do not wrap the answer in ```html fences.";

/// Top-level configuration.
///
/// Loaded from `~/.docuchat/config.toml` or an explicit `--config` path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub provider: ProviderSettings,

    #[serde(default)]
    pub session: SessionConfig,
}

/// Connection settings for the generative backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Override the backend base URL (useful for proxies and tests).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP timeout for one generation call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Environment variable used to seed the credential at start-up.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// What happens when a send is requested while another is still outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrentSendPolicy {
    /// Start another pipeline; the session stays pending until all finish.
    #[default]
    Allow,
    /// Ignore the request while a send is outstanding.
    RejectWhilePending,
}

/// Front-end flags that change what the session asks of the backend or
/// signals to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiOptions {
    /// Ask the backend for Tailwind-styled HTML instead of plain markdown.
    #[serde(default)]
    pub html_answers: bool,

    /// Whether the front-end surfaces the missing-document notice.
    #[serde(default = "default_true")]
    pub show_missing_document_notice: bool,
}

fn default_true() -> bool {
    true
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            html_answers: false,
            show_missing_document_notice: true,
        }
    }
}

/// Behaviour of a single document chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_credential_min_len")]
    pub credential_min_len: usize,

    #[serde(default)]
    pub concurrent_sends: ConcurrentSendPolicy,

    /// Replaces [`GROUNDING_INSTRUCTIONS`] when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instructions: Option<String>,

    #[serde(default)]
    pub ui: UiOptions,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_credential_min_len() -> usize {
    DEFAULT_CREDENTIAL_MIN_LEN
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            credential_min_len: default_credential_min_len(),
            concurrent_sends: ConcurrentSendPolicy::default(),
            system_instructions: None,
            ui: UiOptions::default(),
        }
    }
}

impl SessionConfig {
    /// The full system instructions sent with every request.
    pub fn system_instructions(&self) -> String {
        let base = self
            .system_instructions
            .as_deref()
            .unwrap_or(GROUNDING_INSTRUCTIONS);
        if self.ui.html_answers {
            format!("{base}\n{HTML_ANSWER_INSTRUCTIONS}")
        } else {
            base.to_string()
        }
    }
}
