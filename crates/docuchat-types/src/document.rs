//! Uploaded document types.
//!
//! A [`DocumentPayload`] is what the user hands over; a [`DocumentRef`] is the
//! session-scoped handle the document store gives back; an
//! [`EncodedDocument`] is the base64 transport form sent to the backend.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// MIME type assumed when an upload does not say otherwise.
pub const DEFAULT_MIME_TYPE: &str = "application/pdf";

/// A raw document upload: bytes plus their MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentPayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: Option<String>,
}

impl DocumentPayload {
    pub fn new(bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            file_name: None,
        }
    }

    /// A PDF upload, the common case.
    pub fn pdf(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(bytes, DEFAULT_MIME_TYPE)
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Bytes are elided so a multi-megabyte upload never lands in a log line.
impl fmt::Debug for DocumentPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentPayload")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

/// Opaque, session-scoped handle to a registered document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef(pub Uuid);

impl DocumentRef {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for DocumentRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc:{}", self.0)
    }
}

/// Backend-ready form of a document: base64 data plus MIME type.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedDocument {
    pub mime_type: String,
    /// Standard (padded) base64 of the document bytes.
    pub data: String,
}

impl fmt::Debug for EncodedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedDocument")
            .field("mime_type", &self.mime_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}
