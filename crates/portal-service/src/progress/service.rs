//! Progress service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::types::VideoId;
use portal_database::repositories::{ProgressRepository, VideoRepository};
use portal_entity::progress::{PlaybackProgress, resume_position};

use crate::context::RequestContext;

/// A user's stored progress for one video plus where to start playing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    /// Stored record, if any.
    pub progress: Option<PlaybackProgress>,
    /// Position playback should start from.
    pub resume_position: f64,
}

/// Result of recording a completed playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    /// The completed record.
    pub progress: PlaybackProgress,
    /// The video's view count after the increment.
    pub view_count: i64,
}

/// Loads and saves per-user playback progress.
#[derive(Debug, Clone)]
pub struct ProgressService {
    progress: Arc<dyn ProgressRepository>,
    videos: Arc<dyn VideoRepository>,
}

impl ProgressService {
    /// Creates a new progress service.
    pub fn new(progress: Arc<dyn ProgressRepository>, videos: Arc<dyn VideoRepository>) -> Self {
        Self { progress, videos }
    }

    /// Stored progress and the resume position.
    pub async fn load(
        &self,
        ctx: &RequestContext,
        video_id: VideoId,
        start_time: Option<f64>,
    ) -> AppResult<ProgressSnapshot> {
        self.ensure_video(video_id).await?;
        let progress = self.progress.find(&ctx.user_id, video_id).await?;
        let resume_position = resume_position(progress.as_ref(), start_time);
        Ok(ProgressSnapshot {
            progress,
            resume_position,
        })
    }

    /// Overwrite the record with an in-progress position.
    pub async fn checkpoint(
        &self,
        ctx: &RequestContext,
        video_id: VideoId,
        position: f64,
    ) -> AppResult<PlaybackProgress> {
        check_seconds(position, "Position")?;
        self.ensure_video(video_id).await?;
        let saved = self
            .progress
            .save(&ctx.user_id, video_id, position, false)
            .await?;
        debug!(user_id = %ctx.user_id, video_id = %video_id, position, "Progress checkpoint");
        Ok(saved)
    }

    /// Record a finished playback, then count the view.
    ///
    /// The two writes are independent: if the increment fails the completed
    /// record stays and the error is returned.
    pub async fn complete(
        &self,
        ctx: &RequestContext,
        video_id: VideoId,
        duration: f64,
    ) -> AppResult<CompletionOutcome> {
        check_seconds(duration, "Duration")?;
        self.ensure_video(video_id).await?;
        let progress = self
            .progress
            .save(&ctx.user_id, video_id, duration, true)
            .await?;
        let view_count = self.videos.increment_view_count(video_id).await?;
        info!(user_id = %ctx.user_id, video_id = %video_id, view_count, "Playback completed");
        Ok(CompletionOutcome {
            progress,
            view_count,
        })
    }

    async fn ensure_video(&self, video_id: VideoId) -> AppResult<()> {
        match self.videos.find_by_id(video_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("Video not found")),
        }
    }
}

fn check_seconds(value: f64, what: &str) -> AppResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "{what} must be a non-negative number of seconds"
        )))
    }
}
