//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use portal_api::{AppState, build_app};
use portal_core::config::{AppConfig, DatabaseProvider, IdentityConfig};
use portal_core::types::VideoId;
use portal_database::Store;
use portal_database::repositories::{
    MemoryNotificationRepository, MemoryProgressRepository, MemoryUserRepository,
    MemoryVideoRepository,
};
use portal_entity::video::{Video, VideoSemester, VideoStatus};

/// Organization domain every test account belongs to.
pub const DOMAIN: &str = "example.ac.jp";
/// Identity provider issuer the portal trusts in tests.
pub const ISSUER: &str = "https://issuer.test";
/// Audience the test ID tokens are minted for.
pub const AUDIENCE: &str = "lecture-portal-test";
/// Shared HS256 key between the fake identity provider and the portal.
pub const IDP_SECRET: &str = "integration-idp-secret";
/// Default upload limit for tests.
pub const UPLOAD_LIMIT: u64 = 64 * 1024;
/// Multipart boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "portal-test-boundary";

/// Test application context
pub struct TestApp {
    /// Wired application state
    pub state: AppState,
    /// Direct handle on the video collection for seeding
    pub videos: Arc<MemoryVideoRepository>,
    /// Where uploads land
    pub video_dir: PathBuf,
    _tmp: TempDir,
}

/// A buffered response.
pub struct TestResponse {
    /// Status code
    pub status: StatusCode,
    /// Raw body
    pub body: Bytes,
}

impl TestResponse {
    /// Body parsed as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "response is not JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    /// The `error` message of an error body.
    pub fn error(&self) -> String {
        self.json()["error"].as_str().unwrap_or_default().to_string()
    }
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        Self::with_upload_limit(UPLOAD_LIMIT)
    }

    /// Create a test application with a specific upload limit
    pub fn with_upload_limit(max_upload_size_bytes: u64) -> Self {
        let tmp = tempfile::tempdir().expect("Failed to create temp dir");
        let video_dir = tmp.path().join("videos");

        let mut config = AppConfig::default();
        config.database.provider = DatabaseProvider::Memory;
        config.auth.allowed_domain = DOMAIN.to_string();
        config.auth.session_secret = "integration-session-secret".to_string();
        config.auth.identity = IdentityConfig {
            issuer: ISSUER.to_string(),
            audience: AUDIENCE.to_string(),
            algorithm: "HS256".to_string(),
            verification_key: IDP_SECRET.to_string(),
        };
        config.storage.video_dir = video_dir.to_string_lossy().into_owned();
        config.storage.public_prefix = "/videos".to_string();
        config.storage.max_upload_size_bytes = max_upload_size_bytes;
        config.validate().expect("Test config should be valid");

        let videos = Arc::new(MemoryVideoRepository::new());
        let store = Store::from_parts(
            Arc::new(MemoryUserRepository::new()),
            videos.clone(),
            Arc::new(MemoryProgressRepository::new()),
            Arc::new(MemoryNotificationRepository::new()),
        );
        let state = AppState::new(config, store).expect("Failed to build app state");

        Self {
            state,
            videos,
            video_dir,
            _tmp: tmp,
        }
    }

    /// A fresh router over the shared state
    pub fn router(&self) -> Router {
        build_app(self.state.clone())
    }

    /// Send a request and buffer the response
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router()
            .oneshot(request)
            .await
            .expect("Router should not fail");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        TestResponse { status, body }
    }

    /// Sign in as `<local_part>@example.ac.jp` and return the bearer token
    pub async fn sign_in(&self, local_part: &str) -> String {
        let email = format!("{local_part}@{DOMAIN}");
        let response = self.sign_in_raw(&id_token(local_part, &email)).await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "sign-in failed: {}",
            String::from_utf8_lossy(&response.body)
        );
        response.json()["token"]
            .as_str()
            .expect("token in sign-in response")
            .to_string()
    }

    /// POST /api/auth/sign-in with an arbitrary ID token
    pub async fn sign_in_raw(&self, id_token: &str) -> TestResponse {
        self.send(json_request(
            Method::POST,
            "/api/auth/sign-in",
            None,
            &json!({ "idToken": id_token }),
        ))
        .await
    }

    /// Authenticated GET
    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(empty_request(Method::GET, uri, token)).await
    }

    /// Authenticated DELETE
    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(empty_request(Method::DELETE, uri, token)).await
    }

    /// Authenticated POST with a JSON body
    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: &Value) -> TestResponse {
        self.send(json_request(Method::POST, uri, token, body)).await
    }

    /// Authenticated PUT with a JSON body
    pub async fn put_json(&self, uri: &str, token: Option<&str>, body: &Value) -> TestResponse {
        self.send(json_request(Method::PUT, uri, token, body)).await
    }

    /// Authenticated multipart upload of one part
    pub async fn upload(
        &self,
        token: Option<&str>,
        field: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = multipart_body(field, file_name, content_type, data);
        self.send(builder.body(Body::from(body)).expect("valid request"))
            .await
    }

    /// Insert a catalog record directly, `age_minutes` old
    pub fn seed_video(
        &self,
        title: &str,
        lecture_name: &str,
        grade: i32,
        semester: VideoSemester,
        status: VideoStatus,
        age_minutes: i64,
    ) -> Video {
        let at = Utc::now() - Duration::minutes(age_minutes);
        let video = Video {
            id: VideoId::new(),
            teacher_id: "teacher-uid".to_string(),
            teacher_email: format!("suzuki-ichiro@{DOMAIN}"),
            title: title.to_string(),
            description: format!("{title} lecture recording"),
            lecture_name: lecture_name.to_string(),
            grade,
            semester,
            video_url: format!("/videos/{}.mp4", title.replace(' ', "_")),
            duration: 600.0,
            view_count: 0,
            status,
            created_at: at,
            updated_at: at,
        };
        self.videos.insert(video.clone());
        video
    }

    /// Number of entries in the upload directory
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(&self.video_dir)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|entry| entry.path().is_file())
                    .count()
            })
            .unwrap_or(0)
    }
}

/// Mint an ID token the test identity provider would issue
pub fn id_token(uid: &str, email: &str) -> String {
    let now = Utc::now().timestamp();
    encode(
        &Header::default(),
        &json!({
            "iss": ISSUER,
            "aud": AUDIENCE,
            "sub": uid,
            "email": email,
            "iat": now,
            "exp": now + 600,
        }),
        &EncodingKey::from_secret(IDP_SECRET.as_bytes()),
    )
    .expect("Failed to sign ID token")
}

/// A request without a body
pub fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("valid request")
}

/// A request with a JSON body
pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// A multipart/form-data body with a single file part
pub fn multipart_body(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Percent-encode a query value
pub fn encode_query(value: &str) -> String {
    value
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"-_.~".contains(&b) {
                (b as char).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect()
}
