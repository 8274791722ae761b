//! Process-lifetime credential store.
//!
//! Values live only as long as the process, the same lifetime a browser
//! tab's session storage has. Nothing is written to disk.

use dashmap::DashMap;

use docuchat_core::credential::store::CredentialStore;
use docuchat_types::error::CredentialStoreError;

/// Ephemeral key/value store for credentials.
#[derive(Default)]
pub struct SessionCredentialStore {
    values: DashMap<String, String>,
}

impl SessionCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated from an environment variable.
    ///
    /// When `env_var` is set to a non-blank value it is stored under `key`,
    /// so the session restores it at start-up as if it had been persisted
    /// earlier. Unset or non-Unicode variables leave the store empty.
    pub fn seeded_from_env(key: &str, env_var: &str) -> Self {
        let store = Self::new();
        match std::env::var(env_var) {
            Ok(value) if !value.trim().is_empty() => {
                tracing::debug!(env_var, "seeding credential store from environment");
                store.values.insert(key.to_string(), value);
            }
            _ => {}
        }
        store
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl CredentialStore for SessionCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CredentialStoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CredentialStoreError> {
        self.values.remove(key);
        Ok(())
    }
}
