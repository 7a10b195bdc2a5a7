//! # portal-api
//!
//! HTTP surface of Lecture Portal built on Axum.
//!
//! Handlers stay thin: they extract and validate input, resolve the caller's
//! session into a [`RequestContext`](portal_service::RequestContext), and
//! delegate to `portal-service`. Every failure leaves through [`ApiError`].

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
