//! Catalog search and publish inputs.

use serde::{Deserialize, Serialize};

use portal_core::error::AppError;
use portal_core::types::PrefixRange;
use portal_database::repositories::{NewVideo, VideoSearch};
use portal_entity::video::{VideoSemester, VideoStatus, model::GRADE_RANGE};

use crate::context::RequestContext;

/// Filters a client can combine when searching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Exact grade.
    pub grade: Option<i32>,
    /// Exact semester.
    pub semester: Option<VideoSemester>,
    /// Lecture-name prefix.
    pub lecture_name: Option<String>,
    /// Free-text keyword over title, description, and lecture name.
    pub keyword: Option<String>,
}

impl SearchParams {
    /// The part of the search the store evaluates.
    pub fn store_query(&self) -> VideoSearch {
        VideoSearch {
            grade: self.grade,
            semester: self.semester,
            lecture: self
                .lecture_name
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(PrefixRange::new),
        }
    }

    /// The trimmed, lowercased keyword, if any.
    pub fn normalized_keyword(&self) -> Option<String> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_lowercase)
    }
}

/// What a teacher supplies to publish an uploaded video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishVideo {
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Lecture name.
    pub lecture_name: String,
    /// Grade, 1 through 6.
    pub grade: i32,
    /// Semester.
    pub semester: VideoSemester,
    /// URL returned by the upload endpoint.
    pub video_url: String,
    /// Length in seconds.
    #[serde(default)]
    pub duration: f64,
}

impl PublishVideo {
    /// Validate and turn into a ready catalog record owned by the caller.
    pub fn into_new_video(self, ctx: &RequestContext) -> Result<NewVideo, AppError> {
        let title = self.title.trim();
        let lecture_name = self.lecture_name.trim();
        if title.is_empty() {
            return Err(AppError::validation("Title is required"));
        }
        if lecture_name.is_empty() {
            return Err(AppError::validation("Lecture name is required"));
        }
        if !GRADE_RANGE.contains(&self.grade) {
            return Err(AppError::validation("Grade must be between 1 and 6"));
        }
        if self.video_url.trim().is_empty() {
            return Err(AppError::validation("Video URL is required"));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(AppError::validation("Duration must be a non-negative number"));
        }

        Ok(NewVideo {
            teacher_id: ctx.user_id.clone(),
            teacher_email: ctx.email.clone(),
            title: title.to_string(),
            description: self.description.trim().to_string(),
            lecture_name: lecture_name.to_string(),
            grade: self.grade,
            semester: self.semester,
            video_url: self.video_url.trim().to_string(),
            duration: self.duration,
            status: VideoStatus::Ready,
        })
    }
}
