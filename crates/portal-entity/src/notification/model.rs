//! Announcement entity model.

use chrono::{DateTime, Utc};
use portal_core::types::NotificationId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::term::NoticeTerm;

/// A teacher-authored course announcement.
///
/// Created and deleted, never updated in place. `created_at` is assigned by
/// the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique announcement identifier.
    pub id: NotificationId,
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Course the announcement is about.
    pub course: String,
    /// Grade the course is taught in.
    pub grade: i32,
    /// Term.
    pub semester: NoticeTerm,
    /// Optional link to external course material.
    pub repository_link: Option<String>,
    /// Authoring teacher's user id.
    pub author_id: String,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}
