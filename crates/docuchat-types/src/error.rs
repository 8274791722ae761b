use thiserror::Error;

use crate::document::DocumentRef;

/// Errors related to document storage and encoding.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document not found: {0}")]
    NotFound(DocumentRef),

    #[error("document unreadable: {0}")]
    Unreadable(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from credential store backends.
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("credential store unavailable")]
    Unavailable,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from loading an explicitly requested configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}
