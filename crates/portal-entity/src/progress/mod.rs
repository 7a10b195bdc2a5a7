//! Playback progress entities.

pub mod model;

pub use model::{PlaybackProgress, resume_position};
