//! Session token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_core::types::SessionId;
use portal_entity::user::UserRole;

/// Claims embedded in every portal session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the user id.
    pub sub: String,
    /// Session this token belongs to.
    pub sid: SessionId,
    /// Role at sign-in.
    pub role: UserRole,
    /// Email at sign-in.
    pub email: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

impl SessionClaims {
    /// Expiry as a timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}
