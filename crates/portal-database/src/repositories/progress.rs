//! Playback progress repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use sqlx::PgPool;

use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_core::types::VideoId;
use portal_entity::progress::PlaybackProgress;

/// Access to per-user progress records.
#[async_trait]
pub trait ProgressRepository: Send + Sync + std::fmt::Debug {
    /// Fetch the record for `(user_id, video_id)`.
    async fn find(&self, user_id: &str, video_id: VideoId) -> AppResult<Option<PlaybackProgress>>;

    /// Overwrite the record for `(user_id, video_id)`.
    async fn save(
        &self,
        user_id: &str,
        video_id: VideoId,
        position: f64,
        completed: bool,
    ) -> AppResult<PlaybackProgress>;
}

/// PostgreSQL-backed progress repository.
#[derive(Debug, Clone)]
pub struct PgProgressRepository {
    pool: PgPool,
}

impl PgProgressRepository {
    /// Create a new progress repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressRepository for PgProgressRepository {
    async fn find(&self, user_id: &str, video_id: VideoId) -> AppResult<Option<PlaybackProgress>> {
        sqlx::query_as::<_, PlaybackProgress>(
            "SELECT * FROM playback_progress WHERE user_id = $1 AND video_id = $2",
        )
        .bind(user_id)
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load progress", e))
    }

    async fn save(
        &self,
        user_id: &str,
        video_id: VideoId,
        position: f64,
        completed: bool,
    ) -> AppResult<PlaybackProgress> {
        sqlx::query_as::<_, PlaybackProgress>(
            "INSERT INTO playback_progress (user_id, video_id, last_position, completed, last_updated) \
             VALUES ($1, $2, $3, $4, NOW()) \
             ON CONFLICT (user_id, video_id) DO UPDATE SET \
               last_position = EXCLUDED.last_position, \
               completed = EXCLUDED.completed, \
               last_updated = NOW() \
             RETURNING *",
        )
        .bind(user_id)
        .bind(video_id)
        .bind(position)
        .bind(completed)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save progress", e))
    }
}

/// In-memory progress repository.
#[derive(Debug, Default)]
pub struct MemoryProgressRepository {
    records: DashMap<(String, VideoId), PlaybackProgress>,
}

impl MemoryProgressRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for MemoryProgressRepository {
    async fn find(&self, user_id: &str, video_id: VideoId) -> AppResult<Option<PlaybackProgress>> {
        Ok(self
            .records
            .get(&(user_id.to_string(), video_id))
            .map(|entry| entry.value().clone()))
    }

    async fn save(
        &self,
        user_id: &str,
        video_id: VideoId,
        position: f64,
        completed: bool,
    ) -> AppResult<PlaybackProgress> {
        let record = PlaybackProgress {
            user_id: user_id.to_string(),
            video_id,
            last_position: position,
            completed,
            last_updated: Utc::now(),
        };
        self.records
            .insert((record.user_id.clone(), video_id), record.clone());
        Ok(record)
    }
}
