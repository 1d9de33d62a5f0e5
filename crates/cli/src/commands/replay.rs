//! Replay a recorded session.

use std::io::Write;

use anyhow::{Context, Result};
use laptime_bus::{LineSink, TimingPublisher};
use laptime_core::{StaticBestTimeArchive, TimingEvent};
use laptime_recorder::{SessionRecorder, replay};
use laptime_track::CheckpointDefinitions;

use crate::commands::ReplayArgs;
use crate::context::CliContext;
use crate::error::CliError;
use crate::output;

/// Execute the replay command.
pub fn execute(args: &ReplayArgs, ctx: &CliContext) -> Result<()> {
    let recording = SessionRecorder::load_recording(&args.file)?;

    // Recordings carry their own track; only fall back to the file without one.
    let definitions = match &recording.metadata.checkpoints {
        Some(_) => CheckpointDefinitions::default(),
        None => ctx.load_checkpoints()?,
    };

    let events = replay(
        &recording,
        &ctx.config,
        &definitions,
        &StaticBestTimeArchive::default(),
    )
    .with_context(|| format!("replaying {}", args.file.display()))?;

    if args.summary {
        output::print_lap_summary(&events);
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut publisher = TimingPublisher::new(LineSink::new(stdout.lock()), ctx.config.topics.clone());
    publisher.publish_all(&events).map_err(CliError::from)?;
    publisher.into_sink().into_inner().flush()?;

    tracing::info!(
        events = events.len(),
        laps = events.iter().filter_map(TimingEvent::as_lap).count(),
        "replay complete"
    );
    Ok(())
}
