//! Loading documents from the local filesystem.

use std::path::Path;

use docuchat_types::document::{DEFAULT_MIME_TYPE, DocumentPayload};
use docuchat_types::error::DocumentError;

/// Read `path` into a payload, guessing the MIME type from the extension.
///
/// No size or content validation happens here.
pub async fn load_document(path: &Path) -> Result<DocumentPayload, DocumentError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| DocumentError::Unreadable(format!("{}: {e}", path.display())))?;

    let mut payload = DocumentPayload::new(bytes, mime_type_for(path));
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        payload = payload.with_file_name(name);
    }

    tracing::debug!(
        path = %path.display(),
        mime_type = %payload.mime_type,
        bytes = payload.len(),
        "read document from disk"
    );
    Ok(payload)
}

/// MIME type for a file extension the backend accepts inline.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("html" | "htm") => "text/html",
        Some("csv") => "text/csv",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => DEFAULT_MIME_TYPE,
    }
}
