//! # portal-service
//!
//! Business logic for Lecture Portal. Each service orchestrates repositories,
//! storage, and auth to implement one use case family.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references, and every call that acts on
//! behalf of a user takes an explicit [`RequestContext`].

pub mod auth;
pub mod catalog;
pub mod context;
pub mod notification;
pub mod progress;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{AuthService, SignInResult};
pub use catalog::{CatalogService, PublishVideo, SearchParams};
pub use context::RequestContext;
pub use notification::{NotificationQuery, NotificationService};
pub use progress::{
    CompletionOutcome, PlaybackTracker, ProgressService, ProgressSnapshot, TrackerEvent,
};
pub use upload::UploadService;
