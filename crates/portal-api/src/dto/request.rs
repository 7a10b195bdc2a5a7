//! Request DTOs with validation.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use portal_core::error::AppError;
use portal_entity::notification::{NoticeTerm, NotificationDraft};
use portal_entity::video::VideoSemester;
use portal_service::{NotificationQuery, PublishVideo, SearchParams};

/// Sign-in request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    /// ID token issued by the identity provider.
    #[validate(length(min = 1, message = "ID token is required"))]
    pub id_token: String,
}

/// Progress checkpoint body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckpointRequest {
    /// Playback position in seconds.
    #[validate(range(min = 0.0, message = "Position must be a non-negative number of seconds"))]
    pub position: f64,
}

/// Playback completion body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompleteRequest {
    /// Video length in seconds.
    #[validate(range(min = 0.0, message = "Duration must be a non-negative number of seconds"))]
    pub duration: f64,
}

/// Query string of the progress load endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressQuery {
    /// Explicit start time in seconds, e.g. from a shared link.
    pub start_time: Option<f64>,
}

/// Publish-video request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PublishVideoRequest {
    /// Title.
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Lecture name.
    #[validate(length(min = 1, message = "Lecture name is required"))]
    pub lecture_name: String,
    /// Grade, 1 through 6.
    #[serde(deserialize_with = "deserialize_grade")]
    #[validate(range(min = 1, max = 6, message = "Grade must be between 1 and 6"))]
    pub grade: i32,
    /// Semester.
    pub semester: VideoSemester,
    /// URL returned by the upload endpoint.
    #[validate(length(min = 1, message = "Video URL is required"))]
    pub video_url: String,
    /// Length in seconds.
    #[serde(default)]
    pub duration: f64,
}

impl From<PublishVideoRequest> for PublishVideo {
    fn from(req: PublishVideoRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            lecture_name: req.lecture_name,
            grade: req.grade,
            semester: req.semester,
            video_url: req.video_url,
            duration: req.duration,
        }
    }
}

/// Create-announcement request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    /// Headline.
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Body text.
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    /// Course name.
    #[validate(length(min = 1, message = "Course is required"))]
    pub course: String,
    /// Grade; a number or a numeric string.
    #[serde(deserialize_with = "deserialize_grade")]
    pub grade: i32,
    /// Term.
    pub semester: NoticeTerm,
    /// Optional link to course material.
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    #[validate(url(message = "Repository link must be a valid URL"))]
    pub repository_link: Option<String>,
}

impl From<CreateNotificationRequest> for NotificationDraft {
    fn from(req: CreateNotificationRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            course: req.course,
            grade: req.grade,
            semester: req.semester,
            repository_link: req.repository_link,
        }
    }
}

/// Query string of the video search endpoint. Blank values mean "any".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSearchQuery {
    /// Exact grade.
    pub grade: Option<String>,
    /// Exact semester.
    pub semester: Option<String>,
    /// Lecture-name prefix.
    pub lecture_name: Option<String>,
    /// Free-text keyword.
    pub keyword: Option<String>,
}

impl VideoSearchQuery {
    /// Parse into service search parameters.
    pub fn into_params(self) -> Result<SearchParams, AppError> {
        Ok(SearchParams {
            grade: non_blank(self.grade).map(|g| parse_grade(&g)).transpose()?,
            semester: non_blank(self.semester)
                .map(|s| s.parse::<VideoSemester>())
                .transpose()?,
            lecture_name: non_blank(self.lecture_name),
            keyword: non_blank(self.keyword),
        })
    }
}

/// Query string of the announcement list endpoint. Blank values mean "any".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationListQuery {
    /// Course name.
    pub course: Option<String>,
    /// Grade.
    pub grade: Option<String>,
    /// Term label.
    pub semester: Option<String>,
}

impl NotificationListQuery {
    /// Parse into service filters.
    pub fn into_query(self) -> Result<NotificationQuery, AppError> {
        Ok(NotificationQuery {
            course: non_blank(self.course),
            grade: non_blank(self.grade).map(|g| parse_grade(&g)).transpose()?,
            semester: non_blank(self.semester)
                .map(|s| s.parse::<NoticeTerm>())
                .transpose()?,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_grade(raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::validation(format!("Grade must be a whole number, got '{raw}'")))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GradeInput {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accepts `3`, `3.0`, or `"3"`.
fn deserialize_grade<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let invalid = || D::Error::custom("grade must be a whole number");
    match GradeInput::deserialize(deserializer)? {
        GradeInput::Int(n) => i32::try_from(n).map_err(|_| invalid()),
        GradeInput::Float(f) if f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX) => {
            Ok(f as i32)
        }
        GradeInput::Float(_) => Err(invalid()),
        GradeInput::Text(s) => s.trim().parse().map_err(|_| invalid()),
    }
}

fn deserialize_blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}
