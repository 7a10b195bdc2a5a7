//! Auth handlers: sign-in, sign-out, current session.

use axum::Json;
use axum::extract::State;

use portal_auth::session::SessionRecord;

use crate::dto::request::SignInRequest;
use crate::dto::response::{MessageResponse, SignInResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<SignInRequest>,
) -> Result<Json<SignInResponse>, ApiError> {
    let result = state.auth_service.sign_in(&req.id_token).await?;

    Ok(Json(SignInResponse {
        token: result.issued.token,
        expires_at: result.issued.session.expires_at,
        session: result.issued.session,
        user: result.user,
    }))
}

/// POST /api/auth/sign-out
pub async fn sign_out(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Json<MessageResponse> {
    state.auth_service.sign_out(&auth);
    Json(MessageResponse::new("Signed out"))
}

/// GET /api/auth/session
pub async fn session(auth: AuthUser) -> Json<SessionRecord> {
    Json(auth.session)
}
