//! Announcement list, create, and delete.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::types::NotificationId;
use portal_database::repositories::{NotificationFilter, NotificationRepository};
use portal_entity::notification::{NoticeTerm, Notification, NotificationDraft};

use crate::context::RequestContext;

/// List filters as a client sends them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    /// Course name; surrounding whitespace is ignored.
    pub course: Option<String>,
    /// Grade.
    pub grade: Option<i32>,
    /// Term.
    pub semester: Option<NoticeTerm>,
}

impl NotificationQuery {
    /// Normalise into store filters. A blank course means no course filter.
    pub fn to_filter(&self) -> NotificationFilter {
        NotificationFilter {
            course: self
                .course
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            grade: self.grade,
            semester: self.semester,
        }
    }
}

/// Teacher-authored course announcements.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notices: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notices: Arc<dyn NotificationRepository>) -> Self {
        Self { notices }
    }

    /// Announcements matching every supplied filter, newest first.
    pub async fn list(&self, query: &NotificationQuery) -> AppResult<Vec<Notification>> {
        self.notices.list(&query.to_filter()).await
    }

    /// Post an announcement.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        draft: NotificationDraft,
    ) -> AppResult<Notification> {
        ctx.require_teacher("post announcements")?;
        let draft = normalize(draft)?;
        let notice = self.notices.create(draft, &ctx.user_id).await?;
        info!(notification_id = %notice.id, author_id = %ctx.user_id, "Announcement posted");
        Ok(notice)
    }

    /// Remove an announcement.
    pub async fn delete(&self, ctx: &RequestContext, id: NotificationId) -> AppResult<()> {
        ctx.require_teacher("delete announcements")?;
        self.notices.delete(id).await?;
        info!(notification_id = %id, user_id = %ctx.user_id, "Announcement deleted");
        Ok(())
    }
}

fn normalize(draft: NotificationDraft) -> AppResult<NotificationDraft> {
    let required = |value: String, field: &str| {
        let trimmed = value.trim().to_string();
        if trimmed.is_empty() {
            Err(AppError::validation(format!("{field} is required")))
        } else {
            Ok(trimmed)
        }
    };

    Ok(NotificationDraft {
        title: required(draft.title, "Title")?,
        content: required(draft.content, "Content")?,
        course: required(draft.course, "Course")?,
        grade: draft.grade,
        semester: draft.semester,
        repository_link: draft
            .repository_link
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty()),
    })
}
