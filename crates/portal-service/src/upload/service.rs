//! Upload service: role gate in front of the upload receiver.

use std::sync::Arc;

use tracing::info;

use portal_core::result::AppResult;
use portal_core::traits::storage::ByteStream;
use portal_storage::upload::{StoredUpload, UploadReceiver};

use crate::context::RequestContext;

/// Accepts video uploads from teachers.
#[derive(Debug, Clone)]
pub struct UploadService {
    receiver: Arc<UploadReceiver>,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(receiver: Arc<UploadReceiver>) -> Self {
        Self { receiver }
    }

    /// Largest accepted file in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.receiver.max_bytes()
    }

    /// Check the caller may upload at all, before any body is read.
    pub fn authorize(&self, ctx: &RequestContext) -> AppResult<()> {
        ctx.require_teacher("upload videos")
    }

    /// Stream one video file to storage.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        file_name: Option<&str>,
        content_type: Option<&str>,
        body: ByteStream,
    ) -> AppResult<StoredUpload> {
        self.authorize(ctx)?;
        let stored = self.receiver.receive(file_name, content_type, body).await?;
        info!(
            user_id = %ctx.user_id,
            url = %stored.url,
            bytes = stored.size_bytes,
            "Video uploaded"
        );
        Ok(stored)
    }
}
