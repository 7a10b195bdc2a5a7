//! User profile handler.

use axum::Json;
use axum::extract::State;

use portal_entity::user::UserProfile;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state.auth_service.profile(&auth).await?;
    Ok(Json(profile))
}
