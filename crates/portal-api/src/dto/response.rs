//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_auth::session::SessionRecord;
use portal_entity::user::UserProfile;

/// Successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Public URL of the stored file.
    pub video_url: String,
}

/// Successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// The opened session.
    pub session: SessionRecord,
    /// The stored profile.
    pub user: UserProfile,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `"ok"` when every dependency answered, otherwise `"degraded"`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Seconds since start.
    pub uptime_seconds: u64,
    /// Document store state.
    pub database: String,
    /// Video storage state.
    pub storage: String,
    /// Storage backend name, e.g. `"local"`.
    pub storage_provider: String,
    /// Sessions currently held.
    pub active_sessions: usize,
}
