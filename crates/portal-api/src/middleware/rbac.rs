//! Role guard for teacher-only routes.
//!
//! Runs before the handler so a student's upload is refused without reading
//! the body. Services repeat the check for callers that bypass HTTP.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::extractors::AuthUser;

/// Rejects the request with 403 unless the session belongs to a teacher.
pub async fn require_teacher(
    auth: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    auth.require_teacher("perform this action")?;
    Ok(next.run(request).await)
}
