//! Live timing over stdin/stdout.

use std::io::BufReader;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Result, anyhow};
use laptime_bus::channel::unbounded;
use laptime_bus::{
    LineRouter, LineSink, MalformedPolicy, MessageSource, SignalFormat, TimingPipeline,
    TimingPublisher,
};
use laptime_config::CrossingSource;
use laptime_core::{LapTimer, StaticBestTimeArchive, SystemClock};
use laptime_recorder::{RecordingTap, SessionRecorder, SharedRecorder, TapKind};
use laptime_track::load_or_define;

use crate::commands::RunArgs;
use crate::context::CliContext;
use crate::error::CliError;
use crate::prompt::PromptDefiner;

/// Execute the run command.
pub fn execute(args: &RunArgs, ctx: &CliContext) -> Result<()> {
    let config = &ctx.config;
    let definitions =
        load_or_define(&ctx.checkpoints_path, &mut PromptDefiner::new()).map_err(CliError::from)?;

    let timer = LapTimer::from_config(
        config,
        &definitions,
        &StaticBestTimeArchive::default(),
        SystemClock,
    )?;

    let recorder: Option<SharedRecorder> = match &args.record {
        Some(path) => {
            let mut recorder =
                SessionRecorder::new(path.clone())?.with_checkpoints(definitions.clone());
            recorder.start_recording(config.crossing_source);
            Some(Arc::new(Mutex::new(recorder)))
        }
        None => None,
    };

    let (crossing_sink, crossing_rx) = unbounded();
    let (driver_sink, driver_rx) = unbounded();
    let router = LineRouter::new()
        .route(config.topics.driver.clone(), driver_sink)
        .route(config.topics.positions.clone(), crossing_sink.clone())
        .untopiced(crossing_sink)
        .spawn(BufReader::new(std::io::stdin()))
        .map_err(CliError::from)?;

    let crossing_kind = match config.crossing_source {
        CrossingSource::Positions => TapKind::Positions,
        CrossingSource::CheckpointSignals => TapKind::CheckpointSignals(SignalFormat::Decimal),
    };
    let crossings = tap(crossing_rx, crossing_kind, recorder.as_ref());
    let drivers = tap(driver_rx, TapKind::Drivers, recorder.as_ref());

    let publisher = TimingPublisher::new(LineSink::new(std::io::stdout()), config.topics.clone());
    let mut pipeline = TimingPipeline::new(
        timer,
        crossings,
        drivers,
        publisher,
        config.crossing_source,
    )
    .with_signal_format(SignalFormat::Decimal);

    let policy = if args.skip_malformed {
        MalformedPolicy::Skip
    } else {
        MalformedPolicy::Fail
    };

    tracing::info!(
        checkpoints = definitions.len(),
        source = ?config.crossing_source,
        "timing session started"
    );
    let outcome = pipeline.run(policy);

    // Whatever was captured before a failure is still written out.
    if let Some(recorder) = recorder {
        let saved = recorder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stop_recording(args.description.clone());
        match saved {
            Ok(recording) => {
                tracing::info!(entries = recording.entries.len(), "session recorded");
            }
            Err(e) if outcome.is_err() => {
                tracing::warn!(error = %e, "failed to save partial recording");
            }
            Err(e) => return Err(e),
        }
    }

    let stats = outcome.map_err(CliError::from)?;

    let routed = router
        .join()
        .map_err(|_panic| anyhow!("input reader thread panicked"))?
        .map_err(CliError::from)?;

    tracing::info!(
        lines = routed.lines,
        unrouted = routed.unrouted,
        ticks = stats.ticks,
        events = stats.events,
        skipped = stats.skipped,
        laps = pipeline.timer().laps_completed(),
        "timing session finished"
    );

    Ok(())
}

fn tap<S>(source: S, kind: TapKind, recorder: Option<&SharedRecorder>) -> Box<dyn MessageSource>
where
    S: MessageSource + 'static,
{
    match recorder {
        Some(recorder) => Box::new(RecordingTap::new(source, kind, Arc::clone(recorder))),
        None => Box::new(source),
    }
}
