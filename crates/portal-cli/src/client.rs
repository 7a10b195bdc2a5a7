//! HTTP client for the portal API.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use portal_auth::session::SessionRecord;
use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_core::types::{NotificationId, VideoId};
use portal_entity::notification::{Notification, NotificationDraft};
use portal_entity::progress::PlaybackProgress;
use portal_entity::user::UserProfile;
use portal_entity::video::Video;
use portal_service::{
    CompletionOutcome, NotificationQuery, ProgressSnapshot, PublishVideo, SearchParams,
};

/// Sign-in reply from the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInReply {
    /// Bearer token.
    pub token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// Opened session.
    pub session: SessionRecord,
    /// Stored profile.
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadReply {
    video_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Talks to one portal server, optionally as a signed-in user.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl PortalClient {
    /// Client for the server at `base_url`, e.g. `http://localhost:3001`.
    pub fn new(base_url: &str) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Use `token` as the bearer token for later calls.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> AppResult<Url> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| AppError::configuration(format!("Invalid server URL: {e}")))
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> AppResult<reqwest::Response> {
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|e| AppError::external(format!("Request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        };
        Err(AppError::new(kind_for(status), message))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        self.execute(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| AppError::external(format!("Unexpected response: {e}")))
    }

    /// POST /api/auth/sign-in
    pub async fn sign_in(&self, id_token: &str) -> AppResult<SignInReply> {
        let body = serde_json::json!({ "idToken": id_token });
        self.send(self.http.post(self.url("/api/auth/sign-in")?).json(&body))
            .await
    }

    /// POST /api/auth/sign-out
    pub async fn sign_out(&self) -> AppResult<()> {
        self.execute(self.http.post(self.url("/api/auth/sign-out")?))
            .await
            .map(|_| ())
    }

    /// GET /api/auth/session
    pub async fn session(&self) -> AppResult<SessionRecord> {
        self.send(self.http.get(self.url("/api/auth/session")?)).await
    }

    /// GET /api/users/me
    pub async fn me(&self) -> AppResult<UserProfile> {
        self.send(self.http.get(self.url("/api/users/me")?)).await
    }

    /// GET /api/videos
    pub async fn recent_videos(&self) -> AppResult<Vec<Video>> {
        self.send(self.http.get(self.url("/api/videos")?)).await
    }

    /// GET /api/videos/search
    pub async fn search_videos(&self, params: &SearchParams) -> AppResult<Vec<Video>> {
        let mut url = self.url("/api/videos/search")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(grade) = params.grade {
                query.append_pair("grade", &grade.to_string());
            }
            if let Some(semester) = params.semester {
                query.append_pair("semester", semester.as_str());
            }
            if let Some(lecture) = &params.lecture_name {
                query.append_pair("lectureName", lecture);
            }
            if let Some(keyword) = &params.keyword {
                query.append_pair("keyword", keyword);
            }
        }
        self.send(self.http.get(url)).await
    }

    /// GET /api/videos/{id}
    pub async fn video(&self, id: VideoId) -> AppResult<Video> {
        self.send(self.http.get(self.url(&format!("/api/videos/{id}"))?))
            .await
    }

    /// POST /api/upload, streaming the file from disk. Returns the video URL.
    pub async fn upload(&self, path: &Path, content_type: &str) -> AppResult<String> {
        let file = tokio::fs::File::open(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::NotFound,
                format!("Cannot open {}", path.display()),
                e,
            )
        })?;
        let length = file.metadata().await?.len();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video")
            .to_string();

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let part = Part::stream_with_length(body, length)
            .file_name(file_name)
            .mime_str(content_type)
            .map_err(|e| AppError::validation(format!("Invalid content type: {e}")))?;
        let form = Form::new().part("video", part);

        let reply: UploadReply = self
            .send(self.http.post(self.url("/api/upload")?).multipart(form))
            .await?;
        Ok(reply.video_url)
    }

    /// POST /api/videos
    pub async fn publish(&self, input: &PublishVideo) -> AppResult<Video> {
        self.send(self.http.post(self.url("/api/videos")?).json(input))
            .await
    }

    /// GET /api/progress/{videoId}
    pub async fn load_progress(
        &self,
        video_id: VideoId,
        start_time: Option<f64>,
    ) -> AppResult<ProgressSnapshot> {
        let mut url = self.url(&format!("/api/progress/{video_id}"))?;
        if let Some(start) = start_time {
            url.query_pairs_mut()
                .append_pair("startTime", &start.to_string());
        }
        self.send(self.http.get(url)).await
    }

    /// PUT /api/progress/{videoId}
    pub async fn checkpoint(&self, video_id: VideoId, position: f64) -> AppResult<PlaybackProgress> {
        let body = serde_json::json!({ "position": position });
        self.send(
            self.http
                .put(self.url(&format!("/api/progress/{video_id}"))?)
                .json(&body),
        )
        .await
    }

    /// POST /api/progress/{videoId}/complete
    pub async fn complete(&self, video_id: VideoId, duration: f64) -> AppResult<CompletionOutcome> {
        let body = serde_json::json!({ "duration": duration });
        self.send(
            self.http
                .post(self.url(&format!("/api/progress/{video_id}/complete"))?)
                .json(&body),
        )
        .await
    }

    /// GET /api/notifications
    pub async fn notifications(&self, query: &NotificationQuery) -> AppResult<Vec<Notification>> {
        let mut url = self.url("/api/notifications")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(course) = &query.course {
                pairs.append_pair("course", course);
            }
            if let Some(grade) = query.grade {
                pairs.append_pair("grade", &grade.to_string());
            }
            if let Some(semester) = query.semester {
                pairs.append_pair("semester", semester.as_str());
            }
        }
        self.send(self.http.get(url)).await
    }

    /// POST /api/notifications
    pub async fn create_notification(&self, draft: &NotificationDraft) -> AppResult<Notification> {
        self.send(self.http.post(self.url("/api/notifications")?).json(draft))
            .await
    }

    /// DELETE /api/notifications/{id}
    pub async fn delete_notification(&self, id: NotificationId) -> AppResult<()> {
        self.execute(
            self.http
                .delete(self.url(&format!("/api/notifications/{id}"))?),
        )
        .await
        .map(|_| ())
    }
}

/// Error kind for a non-success HTTP status.
pub fn kind_for(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
        StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
        StatusCode::FORBIDDEN => ErrorKind::Authorization,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        _ => ErrorKind::ExternalService,
    }
}
