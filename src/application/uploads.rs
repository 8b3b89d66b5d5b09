//! Image upload adapter: stores a byte blob and hands back the durable
//! public URL under which the blob is served.
//!
//! This is a thin passthrough to the storage collaborator: no retry,
//! no resumable uploads, no type validation beyond what the backend itself
//! enforces. Callers must surface failures to the user and must not assume
//! partial success.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::warn;

use crate::infra::uploads::{UploadStorage, UploadStorageError};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload failed")]
    Failed(#[source] UploadStorageError),
}

pub struct ImageUploadService {
    storage: Arc<UploadStorage>,
    public_base: String,
}

impl ImageUploadService {
    pub fn new(storage: Arc<UploadStorage>, public_url: &str) -> Self {
        Self {
            storage,
            public_base: public_url.trim_end_matches('/').to_string(),
        }
    }

    /// Store the payload and return its public URL.
    pub async fn upload(&self, data: Bytes, original_name: &str) -> Result<String, UploadError> {
        let stored = self
            .storage
            .store(original_name, data)
            .await
            .map_err(UploadError::Failed)?;

        Ok(format!("{}/uploads/{}", self.public_base, stored.stored_path))
    }

    /// Delete the blob behind a public URL previously returned by
    /// [`ImageUploadService::upload`]. URLs outside this service's upload
    /// prefix are left alone, and a failed delete is logged rather than
    /// surfaced: the post itself has already been saved at that point.
    pub async fn remove(&self, public_url: &str) {
        let prefix = format!("{}/uploads/", self.public_base);
        let Some(stored_path) = public_url.strip_prefix(&prefix) else {
            return;
        };
        if let Err(err) = self.storage.delete(stored_path).await {
            warn!(
                target = "foglio::uploads",
                url = %public_url,
                error = %err,
                "failed to delete replaced upload"
            );
        }
    }
}
