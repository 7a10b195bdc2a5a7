//! Playback progress entity model.

use chrono::{DateTime, Utc};
use portal_core::types::VideoId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-user, per-video resume state.
///
/// Keyed by `(user_id, video_id)`. Each save overwrites the previous record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackProgress {
    /// Owner of this record.
    pub user_id: String,
    /// Video being watched.
    pub video_id: VideoId,
    /// Last saved position in seconds.
    pub last_position: f64,
    /// Whether playback reached the end.
    pub completed: bool,
    /// When the record was last written.
    pub last_updated: DateTime<Utc>,
}

/// Position playback should start from.
///
/// An explicit start time greater than zero wins. Otherwise an incomplete
/// record resumes at its saved position; a completed record or no record
/// starts from zero.
pub fn resume_position(record: Option<&PlaybackProgress>, start_time: Option<f64>) -> f64 {
    if let Some(start) = start_time.filter(|t| *t > 0.0) {
        return start;
    }
    match record {
        Some(progress) if !progress.completed => progress.last_position,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(position: f64, completed: bool) -> PlaybackProgress {
        PlaybackProgress {
            user_id: "u1".into(),
            video_id: VideoId::new(),
            last_position: position,
            completed,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_explicit_start_wins() {
        let rec = record(90.0, false);
        assert_eq!(resume_position(Some(&rec), Some(42.0)), 42.0);
    }

    #[test]
    fn test_zero_start_time_falls_through() {
        let rec = record(90.0, false);
        assert_eq!(resume_position(Some(&rec), Some(0.0)), 90.0);
    }

    #[test]
    fn test_completed_record_starts_over() {
        let rec = record(1800.0, true);
        assert_eq!(resume_position(Some(&rec), None), 0.0);
    }

    #[test]
    fn test_no_record() {
        assert_eq!(resume_position(None, None), 0.0);
    }
}
