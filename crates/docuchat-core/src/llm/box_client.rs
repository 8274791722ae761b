//! BoxAiClient -- object-safe dynamic dispatch wrapper for AiClient.
//!
//! 1. Define an object-safe `AiClientDyn` trait with boxed futures
//! 2. Blanket-impl `AiClientDyn` for all `T: AiClient`
//! 3. `BoxAiClient` wraps `Box<dyn AiClientDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use secrecy::SecretString;

use docuchat_types::llm::{GenerateRequest, GenerateResponse, LlmError};

use super::client::AiClient;

/// Object-safe version of [`AiClient`] with boxed futures.
pub trait AiClientDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_boxed<'a>(
        &'a self,
        credential: &'a SecretString,
        request: &'a GenerateRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GenerateResponse, LlmError>> + Send + 'a>>;
}

impl<T: AiClient> AiClientDyn for T {
    fn name(&self) -> &str {
        AiClient::name(self)
    }

    fn generate_boxed<'a>(
        &'a self,
        credential: &'a SecretString,
        request: &'a GenerateRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GenerateResponse, LlmError>> + Send + 'a>> {
        Box::pin(self.generate(credential, request))
    }
}

/// Type-erased backend for runtime selection.
///
/// The session controller holds one of these so it does not need to be
/// generic over the concrete client.
pub struct BoxAiClient {
    inner: Box<dyn AiClientDyn + Send + Sync>,
}

impl BoxAiClient {
    /// Wrap a concrete `AiClient` in a type-erased box.
    pub fn new<T: AiClient + 'static>(client: T) -> Self {
        Self {
            inner: Box::new(client),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn generate(
        &self,
        credential: &SecretString,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, LlmError> {
        self.inner.generate_boxed(credential, request).await
    }
}
