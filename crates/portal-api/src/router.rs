//! Route definitions for the Lecture Portal HTTP API.
//!
//! JSON routes are mounted under `/api`; stored videos are served as static
//! files under the configured public prefix.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::handlers;
use crate::middleware::rbac::require_teacher;
use crate::middleware::static_files::hide_hidden_paths;
use crate::state::AppState;

/// Build the route tree with state applied.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(upload_routes(&state))
        .merge(video_routes(&state))
        .merge(progress_routes())
        .merge(notification_routes(&state))
        .merge(health_routes());

    let prefix = public_prefix(&state.config.storage.public_prefix);
    let videos = Router::new()
        .fallback_service(ServeDir::new(&state.config.storage.video_dir))
        .layer(axum_middleware::from_fn(hide_hidden_paths));

    Router::new()
        .nest("/api", api_routes)
        .nest_service(&prefix, videos)
        .with_state(state)
}

/// Normalised mount point for stored videos, e.g. `/videos`.
fn public_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/videos".to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Sign-in, sign-out, current session
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-in", post(handlers::auth::sign_in))
        .route("/auth/sign-out", post(handlers::auth::sign_out))
        .route("/auth/session", get(handlers::auth::session))
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(handlers::user::get_profile))
}

/// Teacher-only multipart upload. The handler caps the body itself so the
/// part headers are always parsed before the size limit can fire.
fn upload_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/upload", post(handlers::upload::upload_video))
        .layer(DefaultBodyLimit::disable())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_teacher,
        ))
}

fn video_routes(state: &AppState) -> Router<AppState> {
    let publish = Router::new()
        .route("/videos", post(handlers::video::publish))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_teacher,
        ));

    Router::new()
        .route("/videos", get(handlers::video::list_recent))
        .route("/videos/search", get(handlers::video::search))
        .route("/videos/{id}", get(handlers::video::get_video))
        .merge(publish)
}

fn progress_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/progress/{video_id}",
            get(handlers::progress::load).put(handlers::progress::checkpoint),
        )
        .route(
            "/progress/{video_id}/complete",
            post(handlers::progress::complete),
        )
}

fn notification_routes(state: &AppState) -> Router<AppState> {
    let teacher_only = Router::new()
        .route("/notifications", post(handlers::notification::create_notification))
        .route(
            "/notifications/{id}",
            delete(handlers::notification::delete_notification),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_teacher,
        ));

    Router::new()
        .route("/notifications", get(handlers::notification::list_notifications))
        .merge(teacher_only)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
