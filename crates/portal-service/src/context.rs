//! Request context carrying the authenticated session through service calls.

use chrono::{DateTime, Utc};

use portal_auth::session::SessionRecord;
use portal_core::error::AppError;
use portal_core::types::SessionId;
use portal_entity::user::UserRole;

/// Who is making the current request.
///
/// Built by the API layer from the resolved session and passed to every
/// service method that acts on a user's behalf.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user's id.
    pub user_id: String,
    /// The current session.
    pub session_id: SessionId,
    /// Role at sign-in.
    pub role: UserRole,
    /// Email at sign-in.
    pub email: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Context for a request made under `session`.
    pub fn from_session(session: &SessionRecord) -> Self {
        Self {
            user_id: session.user_id.clone(),
            session_id: session.id,
            role: session.role,
            email: session.email.clone(),
            request_time: Utc::now(),
        }
    }

    /// Whether the caller is a teacher.
    pub fn is_teacher(&self) -> bool {
        self.role.is_teacher()
    }

    /// Fail with 403 unless the caller is a teacher.
    pub fn require_teacher(&self, action: &str) -> Result<(), AppError> {
        if self.is_teacher() {
            Ok(())
        } else {
            Err(AppError::authorization(format!("Only teachers can {action}")))
        }
    }
}
