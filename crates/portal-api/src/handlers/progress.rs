//! Playback progress handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use portal_core::types::VideoId;
use portal_entity::progress::PlaybackProgress;
use portal_service::{CompletionOutcome, ProgressSnapshot};

use crate::dto::request::{CheckpointRequest, CompleteRequest, ProgressQuery};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson, parse_id};
use crate::state::AppState;

/// GET /api/progress/{videoId}
pub async fn load(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<String>,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<ProgressSnapshot>, ApiError> {
    let video_id: VideoId = parse_id(&video_id)?;
    let snapshot = state
        .progress_service
        .load(&auth, video_id, query.start_time)
        .await?;
    Ok(Json(snapshot))
}

/// PUT /api/progress/{videoId}
pub async fn checkpoint(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<String>,
    ValidJson(req): ValidJson<CheckpointRequest>,
) -> Result<Json<PlaybackProgress>, ApiError> {
    let video_id: VideoId = parse_id(&video_id)?;
    let saved = state
        .progress_service
        .checkpoint(&auth, video_id, req.position)
        .await?;
    Ok(Json(saved))
}

/// POST /api/progress/{videoId}/complete
pub async fn complete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<String>,
    ValidJson(req): ValidJson<CompleteRequest>,
) -> Result<Json<CompletionOutcome>, ApiError> {
    let video_id: VideoId = parse_id(&video_id)?;
    let outcome = state
        .progress_service
        .complete(&auth, video_id, req.duration)
        .await?;
    Ok(Json(outcome))
}
