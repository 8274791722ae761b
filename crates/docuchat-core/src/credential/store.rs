//! Credential store trait definition.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use docuchat_types::error::CredentialStoreError;

/// Ephemeral key/value storage for the access credential.
///
/// Scoped to the lifetime of the client context; nothing written here is
/// expected to survive a restart.
pub trait CredentialStore: Send + Sync {
    /// Retrieve a value by key. Returns None if nothing is stored.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, CredentialStoreError>> + Send;

    /// Store a value, replacing any previous one.
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), CredentialStoreError>> + Send;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), CredentialStoreError>> + Send;
}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`CredentialStore`] with boxed futures.
pub trait CredentialStoreDyn: Send + Sync {
    fn get_boxed<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, CredentialStoreError>>;

    fn set_boxed<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, Result<(), CredentialStoreError>>;

    fn remove_boxed<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), CredentialStoreError>>;
}

impl<T: CredentialStore> CredentialStoreDyn for T {
    fn get_boxed<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, CredentialStoreError>> {
        Box::pin(self.get(key))
    }

    fn set_boxed<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, Result<(), CredentialStoreError>> {
        Box::pin(self.set(key, value))
    }

    fn remove_boxed<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), CredentialStoreError>> {
        Box::pin(self.remove(key))
    }
}

/// Shared, type-erased credential store.
pub type DynCredentialStore = Arc<dyn CredentialStoreDyn>;
