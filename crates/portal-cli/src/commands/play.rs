//! Headless playback that saves progress like the web player does.
//!
//! Each tick advances the simulated position by one second. Progress load
//! and save failures are reported and playback carries on.

use std::time::Duration;

use clap::Args;

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::types::VideoId;
use portal_service::{PlaybackTracker, TrackerEvent};

use crate::client::PortalClient;
use crate::commands::Shell;
use crate::output;

/// Arguments for the play command
#[derive(Debug, Args)]
pub struct PlayArgs {
    /// Video ID
    pub id: String,

    /// Start here instead of the saved position (seconds)
    #[arg(long)]
    pub start: Option<f64>,

    /// Simulated seconds of playback per real second
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,

    /// Stop (without completing) once this position is reached
    #[arg(long)]
    pub stop_at: Option<f64>,
}

/// Execute the play command
pub async fn execute(shell: &Shell, args: &PlayArgs) -> AppResult<()> {
    let id: VideoId = args
        .id
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid video id: {}", args.id)))?;
    if !(args.speed.is_finite() && args.speed > 0.0) {
        return Err(AppError::validation("Speed must be a positive number"));
    }

    let video = shell.client.video(id).await?;
    let duration = video.duration;
    if duration <= 0.0 && args.stop_at.is_none() {
        return Err(AppError::validation(
            "Video length is unknown; pass --stop-at to bound playback",
        ));
    }

    let start = args.start.filter(|s| *s > 0.0);
    let resume = match shell.client.load_progress(id, start).await {
        Ok(snapshot) => snapshot.resume_position,
        Err(e) => {
            tracing::warn!(video_id = %id, error = %e, "Could not load progress");
            output::print_warning("Could not load saved progress; starting from the beginning");
            start.unwrap_or(0.0)
        }
    };

    let mut tracker = PlaybackTracker::default();
    tracker.resume_at(resume);
    tracker.set_duration(duration);

    println!(
        "▶ {} from {} / {}",
        video.title,
        output::clock(resume),
        output::clock(duration)
    );

    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / args.speed));
    ticker.tick().await;
    let mut position = resume;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                println!("\n■ Stopped at {}", output::clock(position));
                return Ok(());
            }
        }

        position += 1.0;

        if duration > 0.0 && position >= duration {
            if let Some(event) = tracker.on_ended() {
                persist(&shell.client, id, event).await;
            }
            println!("■ Finished");
            return Ok(());
        }
        if args.stop_at.is_some_and(|stop| position >= stop) {
            println!("■ Stopped at {}", output::clock(position));
            return Ok(());
        }
        if let Some(event) = tracker.on_time_update(position) {
            persist(&shell.client, id, event).await;
        }
    }
}

/// Save a tracker event. Failures are reported, never fatal.
async fn persist(client: &PortalClient, id: VideoId, event: TrackerEvent) {
    let result = match event {
        TrackerEvent::Checkpoint { position } => client
            .checkpoint(id, position)
            .await
            .map(|_| format!("Saved position {}", output::clock(position))),
        TrackerEvent::Complete { duration } => client
            .complete(id, duration)
            .await
            .map(|done| format!("Completed; {} views", done.view_count)),
    };

    match result {
        Ok(message) => output::print_success(&message),
        Err(e) => {
            tracing::warn!(video_id = %id, error = %e, "Could not save progress");
            output::print_warning("Could not save progress; playback continues");
        }
    }
}
