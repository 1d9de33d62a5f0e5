//! Deterministic replay of a recorded session.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use laptime_config::LapTimerConfig;
use laptime_core::{BestTimeArchive, LapTimer, ManualClock, TimingEvent};
use laptime_track::{CheckpointDefinitions, Point};

use crate::session::{RecordedInput, SessionRecording};

/// Feed every entry of `recording` through a fresh timer and collect the
/// events it emits, starting with the opening best-time snapshot.
///
/// The track embedded in the recording wins over `definitions`. The timer
/// starts at offset zero and the clock is moved to each entry's offset
/// before the entry is applied.
///
/// # Errors
///
/// Fails when the track is empty, an offset is negative, non-finite or
/// earlier than the previous one, or a checkpoint signal is out of range.
pub fn replay(
    recording: &SessionRecording,
    config: &LapTimerConfig,
    definitions: &CheckpointDefinitions,
    archive: &dyn BestTimeArchive,
) -> anyhow::Result<Vec<TimingEvent>> {
    let definitions = recording.metadata.checkpoints.as_ref().unwrap_or(definitions);
    let clock = Arc::new(ManualClock::new());
    let mut timer = LapTimer::from_config(config, definitions, archive, Arc::clone(&clock))?;

    let mut events = vec![timer.start()];
    let mut previous = Duration::ZERO;

    for (index, entry) in recording.entries.iter().enumerate() {
        let offset = Duration::try_from_secs_f64(entry.offset_seconds)
            .with_context(|| format!("entry {index}: invalid offset {}", entry.offset_seconds))?;
        if offset < previous {
            anyhow::bail!(
                "entry {index}: offset {:.3}s is earlier than the previous entry",
                entry.offset_seconds
            );
        }
        previous = offset;
        clock.set_elapsed(offset);

        match &entry.input {
            RecordedInput::Position { x, y } => {
                events.extend(timer.on_position(Point::new(*x, *y)));
            }
            RecordedInput::CheckpointSignal { number } => {
                let emitted = timer
                    .on_checkpoint_signal(*number)
                    .with_context(|| format!("entry {index}"))?;
                events.extend(emitted);
            }
            RecordedInput::Driver { name } => timer.change_driver(name.as_str()),
        }
    }

    tracing::debug!(
        entries = recording.entries.len(),
        events = events.len(),
        laps = timer.laps_completed(),
        "replay finished"
    );
    Ok(events)
}
