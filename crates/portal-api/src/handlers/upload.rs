//! Video upload handler.
//!
//! The `video` part is forwarded chunk by chunk to the upload service
//! through a small channel, so the file is never buffered in memory. The
//! request body is capped here rather than by `DefaultBodyLimit`, which
//! rejects an oversized frame before multipart can read the part headers.

use std::io;

use axum::Json;
use axum::body::Body;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::StatusCode;
use bytes::Bytes;
use futures::channel::mpsc;
use futures::{SinkExt, TryStreamExt};

use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_storage::{LimitTripped, StoredUpload, cap_stream};

use crate::dto::response::UploadResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Multipart field carrying the file.
pub const VIDEO_FIELD: &str = "video";

const CHUNK_QUEUE_DEPTH: usize = 8;

/// Room for multipart boundaries and part headers on top of the file itself.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// POST /api/upload
pub async fn upload_video(
    State(state): State<AppState>,
    auth: AuthUser,
    request: Request,
) -> Result<Json<UploadResponse>, ApiError> {
    state.upload_service.authorize(&auth)?;

    let budget = state
        .config
        .storage
        .max_upload_size_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let (request, overflow) = cap_body(request, budget);
    let mut multipart = Multipart::from_request(request, &state)
        .await
        .map_err(|r| AppError::validation(r.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, &overflow))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }
        let stored = receive_field(&state, &auth, field, &overflow).await?;
        return Ok(Json(UploadResponse {
            video_url: stored.url,
        }));
    }

    Err(AppError::validation("No file uploaded").into())
}

/// Swap the request body for one that fails after `max_bytes`, yielding
/// everything up to the cap first.
fn cap_body(request: Request, max_bytes: u64) -> (Request, LimitTripped) {
    let (parts, body) = request.into_parts();
    let stream = body.into_data_stream().map_err(io::Error::other);
    let (capped, overflow) = cap_stream(Box::pin(stream), max_bytes);
    (Request::from_parts(parts, Body::from_stream(capped)), overflow)
}

async fn receive_field(
    state: &AppState,
    auth: &AuthUser,
    mut field: Field<'_>,
    overflow: &LimitTripped,
) -> AppResult<StoredUpload> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);

    let (mut tx, rx) = mpsc::channel::<io::Result<Bytes>>(CHUNK_QUEUE_DEPTH);
    let overflow = overflow.clone();

    // Ends when the field is exhausted, fails, or the receiver hangs up.
    // Yields the parser's message if the body was malformed.
    let pump = async move {
        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    if tx.send(Ok(chunk)).await.is_err() {
                        return None;
                    }
                }
                Ok(None) => return None,
                Err(e) => {
                    let message = e.body_text();
                    let _ = tx.send(Err(field_io_error(e, &overflow))).await;
                    return Some(message);
                }
            }
        }
    };

    let upload = state.upload_service.upload(
        auth,
        file_name.as_deref(),
        content_type.as_deref(),
        Box::pin(rx),
    );

    match tokio::join!(upload, pump) {
        (Err(e), Some(parse_failure)) if e.kind != ErrorKind::Validation => {
            Err(AppError::validation(parse_failure))
        }
        (stored, _) => stored,
    }
}

fn multipart_error(e: MultipartError, overflow: &LimitTripped) -> AppError {
    if overflow.is_tripped() || e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::validation("File too large")
    } else {
        AppError::validation(e.body_text())
    }
}

/// Body-cap failures become `FileTooLarge` so the receiver reports them
/// like its own size check.
fn field_io_error(e: MultipartError, overflow: &LimitTripped) -> io::Error {
    let kind = if overflow.is_tripped() || e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        io::ErrorKind::FileTooLarge
    } else {
        io::ErrorKind::InvalidData
    };
    io::Error::new(kind, e.body_text())
}
