//! Multipart upload staging.
//!
//! File fields are streamed to the configured upload directory before
//! going to the media store; the staged copy is always removed afterwards,
//! whether or not the store accepted it.

use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::AppError;

/// A file staged on local disk, pending upload to the media store.
#[derive(Debug)]
pub struct StagedFile {
    pub path: PathBuf,
}

impl StagedFile {
    /// Remove the staged copy. Failures are logged, not propagated --
    /// the upload itself already succeeded or failed on its own.
    pub async fn remove(&self) {
        if let Err(err) = fs::remove_file(&self.path).await {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to remove staged upload");
        }
    }
}

/// Stream a multipart file field to the upload directory.
///
/// The staged file keeps the client's extension (the media store and the
/// duration probe key off it) under a fresh UUID stem.
pub async fn stage_field(upload_dir: &str, field: &mut Field<'_>) -> Result<StagedFile, AppError> {
    fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("failed to create upload dir: {e}")))?;

    let ext = field
        .file_name()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .unwrap_or("bin")
        .to_ascii_lowercase();
    let path = PathBuf::from(upload_dir).join(format!("{}.{ext}", Uuid::new_v4()));

    let mut file = fs::File::create(&path)
        .await
        .map_err(|e| AppError::InternalError(format!("failed to stage upload: {e}")))?;

    loop {
        let chunk = field
            .chunk()
            .await
            .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {e}")))?;
        let Some(chunk) = chunk else { break };
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::InternalError(format!("failed to stage upload: {e}")))?;
    }

    file.flush()
        .await
        .map_err(|e| AppError::InternalError(format!("failed to stage upload: {e}")))?;

    Ok(StagedFile { path })
}
