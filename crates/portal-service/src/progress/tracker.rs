//! Client-side playback tracker.
//!
//! Fed the player's time updates, it decides when progress should be saved.
//! It does no I/O itself.

/// Seconds between progress checkpoints.
pub const CHECKPOINT_INTERVAL_SECS: u64 = 30;

/// Something the client should persist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerEvent {
    /// Save an in-progress position.
    Checkpoint {
        /// Current position in seconds.
        position: f64,
    },
    /// Playback reached the end.
    Complete {
        /// Length of the video in seconds.
        duration: f64,
    },
}

/// Tracks one playback session.
#[derive(Debug, Clone)]
pub struct PlaybackTracker {
    interval: u64,
    last_mark: u64,
    position: f64,
    duration: Option<f64>,
    seeking: bool,
    finished: bool,
}

impl Default for PlaybackTracker {
    fn default() -> Self {
        Self::new(CHECKPOINT_INTERVAL_SECS)
    }
}

impl PlaybackTracker {
    /// A tracker checkpointing every `interval` seconds.
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            last_mark: 0,
            position: 0.0,
            duration: None,
            seeking: false,
            finished: false,
        }
    }

    /// Start from a resume position without emitting a checkpoint for it.
    pub fn resume_at(&mut self, position: f64) {
        self.position = position.max(0.0);
        self.last_mark = self.mark_of(self.position);
    }

    /// The player reported the video length.
    pub fn set_duration(&mut self, duration: f64) {
        if duration.is_finite() && duration > 0.0 {
            self.duration = Some(duration);
        }
    }

    /// The user started dragging the seek bar.
    pub fn seek_start(&mut self) {
        self.seeking = true;
    }

    /// The user released the seek bar at `position`.
    pub fn seek_end(&mut self, position: f64) {
        self.seeking = false;
        self.position = position.max(0.0);
    }

    /// Last observed position.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// A periodic time update from the player.
    ///
    /// Emits a checkpoint the first time whole elapsed seconds reach a new
    /// multiple of the interval. Zero never counts, and a position behind the
    /// furthest checkpoint never emits.
    pub fn on_time_update(&mut self, seconds: f64) -> Option<TrackerEvent> {
        if self.seeking || self.finished || !seconds.is_finite() || seconds < 0.0 {
            return None;
        }
        self.position = seconds;
        let mark = self.mark_of(seconds);
        if mark > self.last_mark {
            self.last_mark = mark;
            return Some(TrackerEvent::Checkpoint { position: seconds });
        }
        None
    }

    /// The player reported the end of the video. Emits at most once.
    pub fn on_ended(&mut self) -> Option<TrackerEvent> {
        if self.finished {
            return None;
        }
        self.finished = true;
        let duration = self.duration.unwrap_or(self.position);
        self.position = duration;
        Some(TrackerEvent::Complete { duration })
    }

    fn mark_of(&self, seconds: f64) -> u64 {
        let whole = seconds.floor() as u64;
        whole - whole % self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkpoints(tracker: &mut PlaybackTracker, ticks: impl IntoIterator<Item = f64>) -> Vec<f64> {
        ticks
            .into_iter()
            .filter_map(|t| match tracker.on_time_update(t) {
                Some(TrackerEvent::Checkpoint { position }) => Some(position),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_checkpoint_every_thirty_seconds() {
        let mut tracker = PlaybackTracker::default();
        let saved = checkpoints(&mut tracker, (0..=95).map(f64::from));
        assert_eq!(saved, vec![30.0, 60.0, 90.0]);
    }

    #[test]
    fn test_one_checkpoint_per_mark() {
        let mut tracker = PlaybackTracker::default();
        let saved = checkpoints(&mut tracker, [29.5, 30.2, 30.7, 31.0, 59.9]);
        assert_eq!(saved, vec![30.2]);
    }

    #[test]
    fn test_zero_never_checkpoints() {
        let mut tracker = PlaybackTracker::default();
        assert!(checkpoints(&mut tracker, [0.0, 0.4, 0.9]).is_empty());
    }

    #[test]
    fn test_skipped_marks_emit_once() {
        let mut tracker = PlaybackTracker::default();
        assert_eq!(checkpoints(&mut tracker, [10.0, 125.0]), vec![125.0]);
    }

    #[test]
    fn test_seeking_suppresses_and_backwards_never_emits() {
        let mut tracker = PlaybackTracker::default();
        checkpoints(&mut tracker, [60.0]);
        tracker.seek_start();
        assert!(tracker.on_time_update(90.0).is_none());
        tracker.seek_end(20.0);
        assert!(checkpoints(&mut tracker, [30.0, 45.0, 60.5]).is_empty());
        assert_eq!(checkpoints(&mut tracker, [90.0]), vec![90.0]);
    }

    #[test]
    fn test_resume_does_not_emit() {
        let mut tracker = PlaybackTracker::default();
        tracker.resume_at(95.0);
        assert!(tracker.on_time_update(96.0).is_none());
        assert_eq!(checkpoints(&mut tracker, [120.0]), vec![120.0]);
    }

    #[test]
    fn test_completion_once_with_duration() {
        let mut tracker = PlaybackTracker::default();
        tracker.set_duration(600.0);
        tracker.on_time_update(599.0);
        assert_eq!(
            tracker.on_ended(),
            Some(TrackerEvent::Complete { duration: 600.0 })
        );
        assert!(tracker.on_ended().is_none());
        assert!(tracker.on_time_update(630.0).is_none());
    }

    #[test]
    fn test_completion_without_duration_uses_position() {
        let mut tracker = PlaybackTracker::default();
        tracker.on_time_update(42.0);
        assert_eq!(
            tracker.on_ended(),
            Some(TrackerEvent::Complete { duration: 42.0 })
        );
    }
}
