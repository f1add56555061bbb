//! S3-backed implementation of [`MediaStore`].
//!
//! Objects are keyed `videos/<uuid>.<ext>` / `images/<uuid>.<ext>`; the
//! key doubles as the deletion handle. Public URLs are `<base>/<key>`
//! where the base comes from configuration (a CDN or the bucket website
//! endpoint).

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::ffprobe;
use crate::store::{MediaKind, MediaStore, MediaStoreError, StoredMedia};

/// Media store backed by an S3 bucket.
#[derive(Clone)]
pub struct S3MediaStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3MediaStore {
    pub fn new(client: Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a store from the ambient AWS environment plus
    /// `MEDIA_BUCKET` / `MEDIA_PUBLIC_BASE_URL`.
    pub async fn from_env() -> Result<Self, MediaStoreError> {
        let bucket = std::env::var("MEDIA_BUCKET")
            .map_err(|_| MediaStoreError::Upload("MEDIA_BUCKET must be set".into()))?;
        let public_base_url = std::env::var("MEDIA_PUBLIC_BASE_URL")
            .map_err(|_| MediaStoreError::Upload("MEDIA_PUBLIC_BASE_URL must be set".into()))?;

        let config = aws_config::load_from_env().await;
        Ok(Self::new(Client::new(&config), bucket, public_base_url))
    }

    fn object_key(path: &Path, kind: MediaKind) -> String {
        let prefix = match kind {
            MediaKind::Video => "videos",
            MediaKind::Image => "images",
        };
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin")
            .to_ascii_lowercase();
        format!("{prefix}/{}.{ext}", uuid::Uuid::new_v4())
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload(&self, path: &Path, kind: MediaKind) -> Result<StoredMedia, MediaStoreError> {
        // Probe before the bytes leave the machine; a file ffprobe cannot
        // read is not worth storing.
        let duration_secs = match kind {
            MediaKind::Video => Some(
                ffprobe::probe_duration(path)
                    .await
                    .map_err(|e| MediaStoreError::Probe(e.to_string()))?,
            ),
            MediaKind::Image => None,
        };

        let key = Self::object_key(path, kind);
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| MediaStoreError::Upload(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body)
            .send()
            .await
            .map_err(|e| MediaStoreError::Upload(e.to_string()))?;

        tracing::info!(key = %key, "uploaded media object");

        Ok(StoredMedia {
            url: format!("{}/{key}", self.public_base_url),
            public_id: key,
            duration_secs,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaStoreError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(public_id)
            .send()
            .await
            .map_err(|e| MediaStoreError::Delete(e.to_string()))?;

        tracing::info!(key = %public_id, "deleted media object");
        Ok(())
    }
}
