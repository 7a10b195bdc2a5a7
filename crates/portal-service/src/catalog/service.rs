//! Catalog service.

use std::sync::Arc;

use tracing::{debug, info};

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::types::VideoId;
use portal_database::repositories::VideoRepository;
use portal_entity::video::Video;

use super::query::{PublishVideo, SearchParams};
use crate::context::RequestContext;

/// Browse, search, and publish catalog records.
#[derive(Debug, Clone)]
pub struct CatalogService {
    videos: Arc<dyn VideoRepository>,
}

impl CatalogService {
    /// Creates a new catalog service.
    pub fn new(videos: Arc<dyn VideoRepository>) -> Self {
        Self { videos }
    }

    /// Ready videos, newest first.
    pub async fn recent(&self) -> AppResult<Vec<Video>> {
        self.videos.list_ready().await
    }

    /// Ready videos matching `params`.
    ///
    /// Grade, semester, and lecture prefix are evaluated by the store; the
    /// keyword is applied to what comes back.
    pub async fn search(&self, params: &SearchParams) -> AppResult<Vec<Video>> {
        let mut videos = self.videos.search(&params.store_query()).await?;
        if let Some(keyword) = params.normalized_keyword() {
            videos.retain(|v| v.matches_keyword(&keyword));
        }
        debug!(results = videos.len(), "Catalog search");
        Ok(videos)
    }

    /// One catalog record.
    pub async fn get(&self, id: VideoId) -> AppResult<Video> {
        self.videos
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Video not found"))
    }

    /// Publish an uploaded file as a ready video.
    pub async fn publish(&self, ctx: &RequestContext, input: PublishVideo) -> AppResult<Video> {
        ctx.require_teacher("publish videos")?;
        let new = input.into_new_video(ctx)?;
        let video = self.videos.create(new).await?;
        info!(video_id = %video.id, teacher_id = %ctx.user_id, "Video published");
        Ok(video)
    }
}
