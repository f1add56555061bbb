//! The `MediaStore` trait and its data types.

use std::path::Path;

use async_trait::async_trait;

/// What kind of media is being uploaded. Videos get a duration probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    /// Durable, publicly addressable URL.
    pub url: String,
    /// Opaque handle for later deletion.
    pub public_id: String,
    /// Probed duration in seconds; set for video uploads only.
    pub duration_secs: Option<f64>,
}

/// Errors from the media store boundary.
#[derive(Debug, thiserror::Error)]
pub enum MediaStoreError {
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("delete failed: {0}")]
    Delete(String),

    #[error("duration probe failed: {0}")]
    Probe(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Object/media storage the core depends on.
///
/// Implementations own URL construction and deletion handles; callers
/// never see bucket or key details.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload a local file, returning its durable URL and deletion handle.
    async fn upload(&self, path: &Path, kind: MediaKind) -> Result<StoredMedia, MediaStoreError>;

    /// Delete a previously uploaded object by its handle.
    async fn delete(&self, public_id: &str) -> Result<(), MediaStoreError>;
}
