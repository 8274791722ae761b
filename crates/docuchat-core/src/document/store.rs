//! Document store trait definition.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use docuchat_types::document::{DocumentPayload, DocumentRef};
use docuchat_types::error::DocumentError;

/// Session-scoped storage for uploaded document bytes.
///
/// Hands out opaque [`DocumentRef`] handles. A released handle must no longer
/// resolve, and its bytes must not be retained.
pub trait DocumentStore: Send + Sync {
    /// Register a payload and return a fresh handle to it.
    fn register(
        &self,
        payload: DocumentPayload,
    ) -> impl Future<Output = Result<DocumentRef, DocumentError>> + Send;

    /// Resolve a handle to its payload.
    fn fetch(
        &self,
        document: &DocumentRef,
    ) -> impl Future<Output = Result<Arc<DocumentPayload>, DocumentError>> + Send;

    /// Drop the bytes behind a handle. Releasing an unknown handle is a no-op.
    fn release(&self, document: &DocumentRef)
    -> impl Future<Output = Result<(), DocumentError>> + Send;
}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`DocumentStore`] with boxed futures.
pub trait DocumentStoreDyn: Send + Sync {
    fn register_boxed<'a>(
        &'a self,
        payload: DocumentPayload,
    ) -> BoxFuture<'a, Result<DocumentRef, DocumentError>>;

    fn fetch_boxed<'a>(
        &'a self,
        document: &'a DocumentRef,
    ) -> BoxFuture<'a, Result<Arc<DocumentPayload>, DocumentError>>;

    fn release_boxed<'a>(
        &'a self,
        document: &'a DocumentRef,
    ) -> BoxFuture<'a, Result<(), DocumentError>>;
}

impl<T: DocumentStore> DocumentStoreDyn for T {
    fn register_boxed<'a>(
        &'a self,
        payload: DocumentPayload,
    ) -> BoxFuture<'a, Result<DocumentRef, DocumentError>> {
        Box::pin(self.register(payload))
    }

    fn fetch_boxed<'a>(
        &'a self,
        document: &'a DocumentRef,
    ) -> BoxFuture<'a, Result<Arc<DocumentPayload>, DocumentError>> {
        Box::pin(self.fetch(document))
    }

    fn release_boxed<'a>(
        &'a self,
        document: &'a DocumentRef,
    ) -> BoxFuture<'a, Result<(), DocumentError>> {
        Box::pin(self.release(document))
    }
}

/// Shared, type-erased document store.
pub type DynDocumentStore = Arc<dyn DocumentStoreDyn>;
