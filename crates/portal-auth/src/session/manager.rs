//! Session lifecycle manager: open, authenticate, close.

use std::sync::Arc;

use tracing::{debug, info};

use portal_core::config::AuthConfig;
use portal_core::error::AppError;
use portal_core::types::SessionId;
use portal_entity::user::UserProfile;

use crate::jwt::{SessionTokenDecoder, SessionTokenEncoder};

use super::store::{SessionRecord, SessionStore};

/// A freshly opened session and the token that proves it.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The registered session.
    pub session: SessionRecord,
}

/// Opens, resolves, and ends sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    encoder: Arc<SessionTokenEncoder>,
    decoder: Arc<SessionTokenDecoder>,
    store: Arc<SessionStore>,
}

impl SessionManager {
    /// Create a manager from auth configuration.
    pub fn new(config: &AuthConfig, store: Arc<SessionStore>) -> Self {
        Self {
            encoder: Arc::new(SessionTokenEncoder::new(
                &config.session_secret,
                config.session_ttl_hours,
            )),
            decoder: Arc::new(SessionTokenDecoder::new(&config.session_secret)),
            store,
        }
    }

    /// Open a session for a signed-in user.
    pub fn open(&self, user: &UserProfile) -> Result<IssuedSession, AppError> {
        let purged = self.store.purge_expired();
        if purged > 0 {
            debug!(purged, "Purged expired sessions");
        }

        let session_id = SessionId::new();
        let (token, claims) = self
            .encoder
            .encode(&user.id, session_id, user.role, &user.email)?;

        let session = SessionRecord {
            id: session_id,
            user_id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: chrono::DateTime::from_timestamp(claims.iat, 0)
                .unwrap_or_else(chrono::Utc::now),
            expires_at: claims.expires_at(),
        };
        self.store.insert(session.clone());

        info!(user_id = %user.id, session_id = %session_id, role = %user.role, "Session opened");
        Ok(IssuedSession { token, session })
    }

    /// Resolve a bearer token to its live session.
    pub fn authenticate(&self, token: &str) -> Result<SessionRecord, AppError> {
        let claims = self.decoder.decode(token)?;
        let session = self
            .store
            .get(claims.sid)
            .ok_or_else(|| AppError::authentication("Session has ended"))?;

        if session.is_expired() {
            self.store.remove(session.id);
            return Err(AppError::authentication("Session has expired"));
        }
        Ok(session)
    }

    /// End a session. Ending an unknown session is a no-op.
    pub fn close(&self, session_id: SessionId) {
        if let Some(session) = self.store.remove(session_id) {
            info!(user_id = %session.user_id, session_id = %session_id, "Session closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use portal_entity::user::UserRole;

    fn manager() -> SessionManager {
        let config = AuthConfig {
            allowed_domain: "example.ac.jp".into(),
            session_secret: "test-secret".into(),
            ..AuthConfig::default()
        };
        SessionManager::new(&config, Arc::new(SessionStore::new()))
    }

    fn user() -> UserProfile {
        UserProfile {
            id: "uid-1".into(),
            email: "suzuki@example.ac.jp".into(),
            role: UserRole::Teacher,
            display_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_then_authenticate() {
        let manager = manager();
        let issued = manager.open(&user()).unwrap();
        let session = manager.authenticate(&issued.token).unwrap();
        assert_eq!(session, issued.session);
        assert_eq!(session.role, UserRole::Teacher);
    }

    #[test]
    fn test_closed_session_rejected() {
        let manager = manager();
        let issued = manager.open(&user()).unwrap();
        manager.close(issued.session.id);
        let err = manager.authenticate(&issued.token).unwrap_err();
        assert_eq!(err.message, "Session has ended");
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(manager().authenticate("not-a-token").is_err());
    }
}
