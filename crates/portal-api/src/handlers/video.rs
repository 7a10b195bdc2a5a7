//! Video catalog handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use portal_core::types::VideoId;
use portal_entity::video::Video;

use crate::dto::request::{PublishVideoRequest, VideoSearchQuery};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson, parse_id};
use crate::state::AppState;

/// GET /api/videos
pub async fn list_recent(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Video>>, ApiError> {
    Ok(Json(state.catalog_service.recent().await?))
}

/// GET /api/videos/search
pub async fn search(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<VideoSearchQuery>,
) -> Result<Json<Vec<Video>>, ApiError> {
    let params = query.into_params()?;
    Ok(Json(state.catalog_service.search(&params).await?))
}

/// GET /api/videos/{id}
pub async fn get_video(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Video>, ApiError> {
    let id: VideoId = parse_id(&id)?;
    Ok(Json(state.catalog_service.get(id).await?))
}

/// POST /api/videos
pub async fn publish(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<PublishVideoRequest>,
) -> Result<(StatusCode, Json<Video>), ApiError> {
    let video = state.catalog_service.publish(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(video)))
}
