//! Packing of service account key files into a single base64 line, the form
//! CI secrets expect them in.

use std::path::{Path, PathBuf};

use base64::Engine;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credentials file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("credentials file is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("reading credentials file: {0}")]
    Io(#[source] std::io::Error),
}

/// Encodes the raw bytes of a file, after checking that they hold a JSON
/// document.
pub fn encode_bytes(content: &[u8]) -> Result<String, CredentialError> {
    serde_json::from_slice::<serde::de::IgnoredAny>(content)?;

    Ok(base64::prelude::BASE64_STANDARD.encode(content))
}

pub fn encode_file<P>(path: P) -> Result<String, CredentialError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let content = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CredentialError::NotFound(path.to_path_buf()),
        _ => CredentialError::Io(e),
    })?;

    tracing::debug!(bytes = content.len(), "Read credentials file");

    encode_bytes(&content)
}
