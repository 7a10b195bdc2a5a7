//! The upload receiver.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::traits::storage::{ByteStream, StorageProvider};

use super::limit::limit_stream;
use super::naming::stored_file_name;

/// Fallback when the client sends no file name.
const DEFAULT_FILE_NAME: &str = "video";

/// Hidden directory under the storage root holding uploads in progress.
/// Static serving refuses dot-prefixed paths, so partial files are never
/// reachable by URL.
pub const STAGING_DIR: &str = ".incoming";

/// A file accepted and stored by [`UploadReceiver::receive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Name of the stored file within the video directory.
    pub file_name: String,
    /// Public URL the file is served from.
    pub url: String,
    /// Number of bytes stored.
    pub size_bytes: u64,
}

/// Accepts one video file at a time and streams it to storage.
#[derive(Debug, Clone)]
pub struct UploadReceiver {
    provider: Arc<dyn StorageProvider>,
    max_bytes: u64,
    public_prefix: String,
}

impl UploadReceiver {
    /// Create a receiver writing to `provider`.
    pub fn new(provider: Arc<dyn StorageProvider>, max_bytes: u64, public_prefix: &str) -> Self {
        Self {
            provider,
            max_bytes,
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Largest accepted file in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Reject anything whose declared type is not `video/*`.
    pub fn check_content_type(content_type: Option<&str>) -> AppResult<()> {
        match content_type {
            Some(mime) if mime.starts_with("video/") => Ok(()),
            _ => Err(AppError::validation("Not a video file")),
        }
    }

    /// Store one uploaded file.
    ///
    /// The body is written to a `.part` file under [`STAGING_DIR`] and
    /// renamed into place once it has been fully received, so a rejected
    /// upload leaves nothing behind.
    pub async fn receive(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        body: ByteStream,
    ) -> AppResult<StoredUpload> {
        Self::check_content_type(content_type)?;

        let original = original_name
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_FILE_NAME);
        let file_name = stored_file_name(Utc::now().timestamp_millis(), original);
        let part_name = format!("{STAGING_DIR}/{file_name}.part");

        self.provider.ensure_root().await?;

        let (limited, tripped) = limit_stream(body, self.max_bytes);
        let size_bytes = match self.provider.write_stream(&part_name, limited).await {
            Ok(size) => size,
            Err(e) => {
                if let Err(cleanup) = self.provider.delete(&part_name).await {
                    warn!(file = %part_name, error = %cleanup, "Failed to remove partial upload");
                }
                if tripped.is_tripped() {
                    return Err(AppError::validation("File too large"));
                }
                return Err(e);
            }
        };

        self.provider.rename(&part_name, &file_name).await?;

        info!(file = %file_name, bytes = size_bytes, "Stored uploaded video");
        Ok(StoredUpload {
            url: format!("{}/{}", self.public_prefix, file_name),
            file_name,
            size_bytes,
        })
    }
}
