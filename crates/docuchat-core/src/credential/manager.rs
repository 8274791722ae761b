//! Credential manager.
//!
//! Holds the session's access credential in memory and mirrors it into the
//! ephemeral credential store, but only when it is long enough to plausibly
//! be a real key. Store failures are logged and swallowed: the in-memory value
//! is always authoritative for the running session.

use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};

use super::store::{CredentialStoreDyn, DynCredentialStore};

/// Fixed store key for the backend credential.
pub const CREDENTIAL_KEY: &str = "gemini_api_key";

/// Owns the session credential and its persistence policy.
pub struct CredentialManager {
    store: DynCredentialStore,
    current: Mutex<SecretString>,
    min_len: usize,
}

impl CredentialManager {
    /// Create a manager with an empty credential.
    ///
    /// Call [`restore`](Self::restore) to pick up a previously persisted value.
    pub fn new(store: DynCredentialStore, min_len: usize) -> Self {
        Self {
            store,
            current: Mutex::new(empty_secret()),
            min_len,
        }
    }

    /// Load the persisted credential, if any, into memory.
    ///
    /// Returns true when a value was found.
    pub async fn restore(&self) -> bool {
        match self.store.get_boxed(CREDENTIAL_KEY).await {
            Ok(Some(value)) => {
                self.replace(SecretString::from(value));
                tracing::debug!("restored credential from session store");
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read credential store");
                false
            }
        }
    }

    /// Set the credential.
    ///
    /// The value is always kept in memory. It is persisted only when its
    /// trimmed length reaches the minimum; otherwise any persisted value is
    /// removed so a stale key cannot be restored later.
    pub async fn set_credential(&self, value: &str) {
        self.replace(SecretString::from(value.to_string()));

        let result = if self.meets_min_len(value) {
            self.store.set_boxed(CREDENTIAL_KEY, value).await
        } else {
            tracing::debug!(
                min_len = self.min_len,
                "credential below minimum length, not persisting"
            );
            self.store.remove_boxed(CREDENTIAL_KEY).await
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to update credential store");
        }
    }

    /// Forget the credential in memory and in the store. Idempotent.
    pub async fn clear_credential(&self) {
        self.replace(empty_secret());
        if let Err(e) = self.store.remove_boxed(CREDENTIAL_KEY).await {
            tracing::warn!(error = %e, "failed to clear credential store");
        }
    }

    /// The current in-memory credential (possibly empty).
    pub fn current(&self) -> SecretString {
        self.lock().clone()
    }

    /// Whether a non-blank credential is held in memory.
    pub fn is_set(&self) -> bool {
        !self.lock().expose_secret().trim().is_empty()
    }

    /// Show masked representation: last 4 chars visible.
    pub fn masked(&self) -> String {
        mask_credential(self.lock().expose_secret())
    }

    /// Whether `value` is long enough to be persisted.
    pub fn meets_min_len(&self, value: &str) -> bool {
        value.trim().chars().count() >= self.min_len
    }

    fn replace(&self, value: SecretString) {
        *self.lock() = value;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SecretString> {
        // A poisoned lock still holds a valid credential; keep using it.
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

/// Mask a credential, showing only the last 4 characters.
///
/// - "AIzaSyD-abcdefghijklmnop" -> "****mnop"
/// - "abc" -> "****"
pub fn mask_credential(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        "****".to_string()
    } else {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{tail}")
    }
}
