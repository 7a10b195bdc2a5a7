//! Announcement handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use portal_core::types::NotificationId;
use portal_entity::notification::Notification;

use crate::dto::request::{CreateNotificationRequest, NotificationListQuery};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson, parse_id};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let query = query.into_query()?;
    Ok(Json(state.notification_service.list(&query).await?))
}

/// POST /api/notifications
pub async fn create_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<Notification>), ApiError> {
    let notice = state
        .notification_service
        .create(&auth, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(notice)))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: NotificationId = parse_id(&id)?;
    state.notification_service.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
