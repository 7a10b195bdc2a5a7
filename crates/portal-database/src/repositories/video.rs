//! Video catalog repository.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use sqlx::PgPool;

use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_core::types::{PrefixRange, VideoId};
use portal_entity::video::{Video, VideoSemester, VideoStatus};

/// Store-side search constraints. Keyword matching happens after retrieval.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoSearch {
    /// Exact grade.
    pub grade: Option<i32>,
    /// Exact semester.
    pub semester: Option<VideoSemester>,
    /// Lecture-name prefix range.
    pub lecture: Option<PrefixRange>,
}

impl VideoSearch {
    fn matches(&self, video: &Video) -> bool {
        video.is_ready()
            && self.grade.is_none_or(|g| video.grade == g)
            && self.semester.is_none_or(|s| video.semester == s)
            && self
                .lecture
                .as_ref()
                .is_none_or(|range| range.contains(&video.lecture_name))
    }
}

/// Fields supplied when a teacher publishes an uploaded video.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVideo {
    /// Publishing teacher's user id.
    pub teacher_id: String,
    /// Publishing teacher's email.
    pub teacher_email: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Lecture name.
    pub lecture_name: String,
    /// Grade, already validated to 1 through 6.
    pub grade: i32,
    /// Semester.
    pub semester: VideoSemester,
    /// URL returned by the upload endpoint.
    pub video_url: String,
    /// Length in seconds.
    pub duration: f64,
    /// Initial status.
    pub status: VideoStatus,
}

/// Access to the `videos` collection.
#[async_trait]
pub trait VideoRepository: Send + Sync + std::fmt::Debug {
    /// Ready videos, newest first.
    async fn list_ready(&self) -> AppResult<Vec<Video>>;

    /// Ready videos matching `query`, ordered by status then newest first.
    async fn search(&self, query: &VideoSearch) -> AppResult<Vec<Video>>;

    /// Fetch one video.
    async fn find_by_id(&self, id: VideoId) -> AppResult<Option<Video>>;

    /// Insert a new catalog record with `view_count = 0`.
    async fn create(&self, video: NewVideo) -> AppResult<Video>;

    /// Add one to `view_count`, returning the new count.
    async fn increment_view_count(&self, id: VideoId) -> AppResult<i64>;
}

/// PostgreSQL-backed video repository.
#[derive(Debug, Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    /// Create a new video repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn list_ready(&self) -> AppResult<Vec<Video>> {
        sqlx::query_as::<_, Video>(
            "SELECT * FROM videos WHERE status = 'ready' ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list videos", e))
    }

    async fn search(&self, query: &VideoSearch) -> AppResult<Vec<Video>> {
        let (start, end) = match &query.lecture {
            Some(range) => (Some(range.start.as_str()), Some(range.end.as_str())),
            None => (None, None),
        };

        sqlx::query_as::<_, Video>(
            "SELECT * FROM videos WHERE status = 'ready' \
             AND ($1::int4 IS NULL OR grade = $1) \
             AND ($2::video_semester IS NULL OR semester = $2) \
             AND ($3::text IS NULL OR (lecture_name COLLATE \"C\" >= $3 AND lecture_name COLLATE \"C\" <= $4)) \
             ORDER BY status ASC, created_at DESC",
        )
        .bind(query.grade)
        .bind(query.semester)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search videos", e))
    }

    async fn find_by_id(&self, id: VideoId) -> AppResult<Option<Video>> {
        sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find video", e))
    }

    async fn create(&self, video: NewVideo) -> AppResult<Video> {
        sqlx::query_as::<_, Video>(
            "INSERT INTO videos (id, teacher_id, teacher_email, title, description, lecture_name, \
             grade, semester, video_url, duration, view_count, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 0, $11) RETURNING *",
        )
        .bind(VideoId::new())
        .bind(&video.teacher_id)
        .bind(&video.teacher_email)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.lecture_name)
        .bind(video.grade)
        .bind(video.semester)
        .bind(&video.video_url)
        .bind(video.duration)
        .bind(video.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create video", e))
    }

    async fn increment_view_count(&self, id: VideoId) -> AppResult<i64> {
        let count: Option<i64> = sqlx::query_scalar(
            "UPDATE videos SET view_count = view_count + 1, updated_at = NOW() \
             WHERE id = $1 RETURNING view_count",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to increment views", e))?;

        count.ok_or_else(|| AppError::not_found(format!("Video {id} not found")))
    }
}

/// In-memory video repository.
#[derive(Debug, Default)]
pub struct MemoryVideoRepository {
    videos: DashMap<VideoId, Video>,
}

impl MemoryVideoRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed record, bypassing [`VideoRepository::create`].
    ///
    /// Lets tests seed processing videos and fixed timestamps.
    pub fn insert(&self, video: Video) {
        self.videos.insert(video.id, video);
    }

    fn collect(&self, keep: impl Fn(&Video) -> bool) -> Vec<Video> {
        self.videos
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl VideoRepository for MemoryVideoRepository {
    async fn list_ready(&self) -> AppResult<Vec<Video>> {
        let mut videos = self.collect(Video::is_ready);
        videos.sort_by_key(|v| Reverse(v.created_at));
        Ok(videos)
    }

    async fn search(&self, query: &VideoSearch) -> AppResult<Vec<Video>> {
        let mut videos = self.collect(|v| query.matches(v));
        videos.sort_by_key(|v| (v.status, Reverse(v.created_at)));
        Ok(videos)
    }

    async fn find_by_id(&self, id: VideoId) -> AppResult<Option<Video>> {
        Ok(self.videos.get(&id).map(|entry| entry.value().clone()))
    }

    async fn create(&self, video: NewVideo) -> AppResult<Video> {
        let now = Utc::now();
        let record = Video {
            id: VideoId::new(),
            teacher_id: video.teacher_id,
            teacher_email: video.teacher_email,
            title: video.title,
            description: video.description,
            lecture_name: video.lecture_name,
            grade: video.grade,
            semester: video.semester,
            video_url: video.video_url,
            duration: video.duration,
            view_count: 0,
            status: video.status,
            created_at: now,
            updated_at: now,
        };
        self.videos.insert(record.id, record.clone());
        Ok(record)
    }

    async fn increment_view_count(&self, id: VideoId) -> AppResult<i64> {
        let mut entry = self
            .videos
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Video {id} not found")))?;
        entry.view_count += 1;
        entry.updated_at = Utc::now();
        Ok(entry.view_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn video(title: &str, lecture: &str, grade: i32, status: VideoStatus, age_min: i64) -> Video {
        let at = Utc::now() - Duration::minutes(age_min);
        Video {
            id: VideoId::new(),
            teacher_id: "t1".into(),
            teacher_email: "suzuki@example.ac.jp".into(),
            title: title.into(),
            description: String::new(),
            lecture_name: lecture.into(),
            grade,
            semester: VideoSemester::First,
            video_url: format!("/videos/{title}.mp4"),
            duration: 60.0,
            view_count: 0,
            status,
            created_at: at,
            updated_at: at,
        }
    }

    fn seeded() -> MemoryVideoRepository {
        let repo = MemoryVideoRepository::new();
        repo.insert(video("old", "Calculus I", 1, VideoStatus::Ready, 30));
        repo.insert(video("new", "Calculus II", 2, VideoStatus::Ready, 5));
        repo.insert(video("draft", "Calculus I", 1, VideoStatus::Processing, 1));
        repo.insert(video("bio", "Biology", 1, VideoStatus::Ready, 10));
        repo
    }

    #[tokio::test]
    async fn test_list_ready_newest_first() {
        let titles: Vec<_> = seeded()
            .list_ready()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.title)
            .collect();
        assert_eq!(titles, vec!["new", "bio", "old"]);
    }

    #[tokio::test]
    async fn test_search_never_returns_processing() {
        let results = seeded().search(&VideoSearch::default()).await.unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(Video::is_ready));
    }

    #[tokio::test]
    async fn test_search_prefix_and_grade() {
        let repo = seeded();
        let query = VideoSearch {
            grade: Some(1),
            semester: None,
            lecture: Some(PrefixRange::new("Calc")),
        };
        let results = repo.search(&query).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "old");
    }

    #[tokio::test]
    async fn test_increment_view_count() {
        let repo = MemoryVideoRepository::new();
        let v = video("a", "Physics", 3, VideoStatus::Ready, 0);
        let id = v.id;
        repo.insert(v);
        assert_eq!(repo.increment_view_count(id).await.unwrap(), 1);
        assert_eq!(repo.increment_view_count(id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_increment_missing_video() {
        let repo = MemoryVideoRepository::new();
        let err = repo.increment_view_count(VideoId::new()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
