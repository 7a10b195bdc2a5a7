//! Playback progress: server-side persistence and the client-side tracker.

pub mod service;
pub mod tracker;

pub use service::{CompletionOutcome, ProgressService, ProgressSnapshot};
pub use tracker::{CHECKPOINT_INTERVAL_SECS, PlaybackTracker, TrackerEvent};
