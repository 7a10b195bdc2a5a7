//! Shared fixtures for service unit tests.

use chrono::Utc;

use portal_core::types::SessionId;
use portal_entity::user::UserRole;

use crate::context::RequestContext;

/// A context for user `u1` with `role`.
pub(crate) fn ctx(role: UserRole) -> RequestContext {
    ctx_for("u1", role)
}

/// A context for an arbitrary user.
pub(crate) fn ctx_for(user_id: &str, role: UserRole) -> RequestContext {
    RequestContext {
        user_id: user_id.into(),
        session_id: SessionId::new(),
        role,
        email: format!("{user_id}@example.ac.jp"),
        request_time: Utc::now(),
    }
}
