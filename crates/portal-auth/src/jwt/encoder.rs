//! Session token signing.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use portal_core::error::AppError;
use portal_core::types::SessionId;
use portal_entity::user::UserRole;

use super::claims::SessionClaims;

/// Signs session tokens with HMAC-SHA256.
#[derive(Clone)]
pub struct SessionTokenEncoder {
    encoding_key: EncodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for SessionTokenEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenEncoder")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionTokenEncoder {
    /// Create an encoder for `secret` issuing tokens valid for `ttl_hours`.
    pub fn new(secret: &str, ttl_hours: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours as i64),
        }
    }

    /// Sign a token for one session.
    pub fn encode(
        &self,
        user_id: &str,
        session_id: SessionId,
        role: UserRole,
        email: &str,
    ) -> Result<(String, SessionClaims), AppError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            sid: session_id,
            role,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign session token: {e}")))?;
        Ok((token, claims))
    }
}
