//! Announcement repository.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use sqlx::PgPool;

use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_core::types::NotificationId;
use portal_entity::notification::{NoticeTerm, Notification, NotificationDraft};

/// Optional equality filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationFilter {
    /// Exact course name (already trimmed).
    pub course: Option<String>,
    /// Exact grade.
    pub grade: Option<i32>,
    /// Exact term.
    pub semester: Option<NoticeTerm>,
}

impl NotificationFilter {
    fn matches(&self, notice: &Notification) -> bool {
        self.course.as_deref().is_none_or(|c| notice.course == c)
            && self.grade.is_none_or(|g| notice.grade == g)
            && self.semester.is_none_or(|s| notice.semester == s)
    }
}

/// Access to the `notifications` collection.
#[async_trait]
pub trait NotificationRepository: Send + Sync + std::fmt::Debug {
    /// Announcements matching `filter`, newest first.
    async fn list(&self, filter: &NotificationFilter) -> AppResult<Vec<Notification>>;

    /// Store a new announcement with a server-assigned id and timestamp.
    async fn create(&self, draft: NotificationDraft, author_id: &str) -> AppResult<Notification>;

    /// Remove one announcement. Fails with not-found if it does not exist.
    async fn delete(&self, id: NotificationId) -> AppResult<()>;
}

/// PostgreSQL-backed announcement repository.
#[derive(Debug, Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new announcement repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn list(&self, filter: &NotificationFilter) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications \
             WHERE ($1::text IS NULL OR course = $1) \
             AND ($2::int4 IS NULL OR grade = $2) \
             AND ($3::notice_term IS NULL OR semester = $3) \
             ORDER BY created_at DESC",
        )
        .bind(filter.course.as_deref())
        .bind(filter.grade)
        .bind(filter.semester)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }

    async fn create(&self, draft: NotificationDraft, author_id: &str) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, title, content, course, grade, semester, repository_link, author_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(NotificationId::new())
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(&draft.course)
        .bind(draft.grade)
        .bind(draft.semester)
        .bind(&draft.repository_link)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    async fn delete(&self, id: NotificationId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Notification {id} not found")));
        }
        Ok(())
    }
}

/// In-memory announcement repository.
#[derive(Debug, Default)]
pub struct MemoryNotificationRepository {
    notices: DashMap<NotificationId, Notification>,
}

impl MemoryNotificationRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for MemoryNotificationRepository {
    async fn list(&self, filter: &NotificationFilter) -> AppResult<Vec<Notification>> {
        let mut notices: Vec<Notification> = self
            .notices
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        notices.sort_by_key(|n| Reverse(n.created_at));
        Ok(notices)
    }

    async fn create(&self, draft: NotificationDraft, author_id: &str) -> AppResult<Notification> {
        let notice = Notification {
            id: NotificationId::new(),
            title: draft.title,
            content: draft.content,
            course: draft.course,
            grade: draft.grade,
            semester: draft.semester,
            repository_link: draft.repository_link,
            author_id: author_id.to_string(),
            created_at: Utc::now(),
        };
        self.notices.insert(notice.id, notice.clone());
        Ok(notice)
    }

    async fn delete(&self, id: NotificationId) -> AppResult<()> {
        self.notices
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))
    }
}
