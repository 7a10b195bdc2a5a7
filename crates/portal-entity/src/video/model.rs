//! Video entity model.

use chrono::{DateTime, Utc};
use portal_core::types::VideoId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::{VideoSemester, VideoStatus};

/// Lowest and highest school grade a lecture can be filed under.
pub const GRADE_RANGE: std::ops::RangeInclusive<i32> = 1..=6;

/// A lecture video in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Unique video identifier.
    pub id: VideoId,
    /// Uploading teacher's user id.
    pub teacher_id: String,
    /// Uploading teacher's email.
    pub teacher_email: String,
    /// Video title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Lecture (course) name, used for prefix search.
    pub lecture_name: String,
    /// Grade, 1 through 6.
    pub grade: i32,
    /// Semester.
    pub semester: VideoSemester,
    /// Public URL returned by the upload endpoint.
    pub video_url: String,
    /// Length in seconds.
    pub duration: f64,
    /// Completed playbacks. Never decreases.
    pub view_count: i64,
    /// Processing state.
    pub status: VideoStatus,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// Whether the video is visible to browse and search.
    pub fn is_ready(&self) -> bool {
        self.status == VideoStatus::Ready
    }

    /// Case-insensitive substring match over title, description, and lecture name.
    ///
    /// `needle` must already be trimmed and lowercased.
    pub fn matches_keyword(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        [&self.title, &self.description, &self.lecture_name]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}
