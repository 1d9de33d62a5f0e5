//! Pipeline behaviour over in-process channels.

use std::sync::Arc;
use std::time::Duration;

use laptime_bus::channel::unbounded;
use laptime_bus::{
    BusError, ChannelSink, ChannelSource, LineSink, MalformedPolicy, MessageSink, MessageSource,
    SignalFormat, TimingPipeline, TimingPublisher, encode_driver,
};
use laptime_config::{CrossingSource, LapTimerConfig};
use laptime_core::{LapTimer, ManualClock, StaticBestTimeArchive};
use laptime_test_helpers::prelude::*;

type Pipeline = TimingPipeline<Arc<ManualClock>, ChannelSource, ChannelSource, ChannelSink>;

struct Harness {
    pipeline: Pipeline,
    clock: Arc<ManualClock>,
    crossings: ChannelSink,
    drivers: ChannelSink,
    output: ChannelSource,
}

fn harness(source: CrossingSource) -> Result<Harness, Box<dyn std::error::Error>> {
    let config = LapTimerConfig {
        crossing_source: source,
        ..Default::default()
    };
    let clock = Arc::new(ManualClock::new());
    let timer = LapTimer::from_config(
        &config,
        &reference_definitions(),
        &StaticBestTimeArchive::default(),
        Arc::clone(&clock),
    )?;

    let (crossings, crossing_rx) = unbounded();
    let (drivers, driver_rx) = unbounded();
    let (out_tx, output) = unbounded();

    let pipeline = TimingPipeline::new(
        timer,
        crossing_rx.subscribe(config.topics.positions.clone()),
        driver_rx.subscribe(config.topics.driver.clone()),
        TimingPublisher::new(out_tx, config.topics.clone()),
        config.crossing_source,
    );
    Ok(Harness {
        pipeline,
        clock,
        crossings,
        drivers,
        output,
    })
}

fn drain(source: &mut ChannelSource) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut out = Vec::new();
    while let Some(message) = source.try_recv()? {
        out.push(String::from_utf8(message)?);
    }
    Ok(out)
}

#[test]
fn test_start_publishes_snapshot() -> TestResult {
    let mut h = harness(CrossingSource::Positions)?;
    h.pipeline.start()?;
    let out = drain(&mut h.output)?;
    assert_eq!(
        out,
        vec![
            "lap_start {\"sector_1_best_time\":9.87,\"sector_2_best_time\":4.08,\"sector_3_best_time\":5.53,\"lap_best_time\":19.48}"
        ]
    );
    Ok(())
}

#[test]
fn test_lap_over_the_pipeline() -> TestResult {
    let mut h = harness(CrossingSource::Positions)?;
    h.pipeline.start()?;

    for sample in reference_drive().into_iter().take(2) {
        h.crossings
            .send(format!("pixel_coordinates [{}, {}]", sample.point.x, sample.point.y).as_bytes())?;
        h.clock.set_elapsed(sample.at);
        h.pipeline.tick()?;
    }

    let out = drain(&mut h.output)?;
    assert_eq!(out.len(), 4);
    assert!(out.get(1).is_some_and(|m| m.starts_with("sector_finished ")));
    assert!(out.get(2).is_some_and(|m| m.starts_with("lap_finished ")));
    assert!(out.get(3).is_some_and(|m| m.starts_with("lap_start ")));
    Ok(())
}

#[test]
fn test_driver_change_applies_after_tick() -> TestResult {
    let mut h = harness(CrossingSource::Positions)?;
    h.pipeline.start()?;

    h.drivers.send(&encode_driver("current_driver", "Ada Lovelace"))?;
    h.crossings.send(b"pixel_coordinates [0, 0]")?;
    h.pipeline.tick()?;

    assert_eq!(h.pipeline.timer().driver(), "Ada Lovelace");
    assert_eq!(h.pipeline.stats().driver_changes, 1);
    Ok(())
}

#[test]
fn test_only_one_driver_change_per_tick() -> TestResult {
    let mut h = harness(CrossingSource::Positions)?;
    h.drivers.send(b"current_driver first")?;
    h.drivers.send(b"current_driver second")?;

    h.crossings.send(b"pixel_coordinates [0, 0]")?;
    h.pipeline.tick()?;
    assert_eq!(h.pipeline.timer().driver(), "first");

    h.crossings.send(b"pixel_coordinates [0, 1]")?;
    h.pipeline.tick()?;
    assert_eq!(h.pipeline.timer().driver(), "second");
    Ok(())
}

#[test]
fn test_malformed_position_fails_the_tick() -> TestResult {
    let mut h = harness(CrossingSource::Positions)?;
    h.crossings.send(b"pixel_coordinates [oops]")?;
    let err = h.pipeline.tick();
    assert!(matches!(err, Err(ref e) if e.is_malformed()));
    Ok(())
}

#[test]
fn test_run_skips_malformed_and_stops_on_close() -> TestResult {
    let mut h = harness(CrossingSource::Positions)?;
    h.crossings.send(b"pixel_coordinates [5.5, 4]")?;
    h.crossings.send(b"pixel_coordinates not-json")?;
    h.crossings.send(b"pixel_coordinates [5.5, 6]")?;
    drop(h.crossings);

    let stats = h.pipeline.run(MalformedPolicy::Skip)?;
    assert_eq!(stats.ticks, 3);
    assert_eq!(stats.skipped, 1);
    assert_eq!(h.pipeline.timer().laps_completed(), 1);
    Ok(())
}

#[test]
fn test_run_fails_fast_by_default() -> TestResult {
    let mut h = harness(CrossingSource::Positions)?;
    h.crossings.send(b"pixel_coordinates {}")?;
    drop(h.crossings);

    let result = h.pipeline.run(MalformedPolicy::Fail);
    assert!(matches!(result, Err(BusError::Json(_))));
    Ok(())
}

#[test]
fn test_checkpoint_signals_big_endian() -> TestResult {
    let h = harness(CrossingSource::CheckpointSignals)?;
    let Harness {
        pipeline,
        clock,
        mut output,
        ..
    } = h;

    // Raw signals carry no topic, so feed them through an unfiltered channel.
    let (timer, publisher) = pipeline.into_parts();
    let (mut tx, rx) = unbounded();
    let (_drivers_tx, drivers_rx) = unbounded();
    let mut pipeline = TimingPipeline::new(
        timer,
        rx,
        drivers_rx,
        publisher,
        CrossingSource::CheckpointSignals,
    );
    pipeline.start()?;

    for (secs, number) in [(2u64, 1u8), (4, 2), (7, 3)] {
        tx.send(&[number])?;
        clock.set_elapsed(Duration::from_secs(secs));
        pipeline.tick()?;
    }

    let out = drain(&mut output)?;
    let lap = must_some(
        out.iter().find(|m| m.starts_with("lap_finished ")),
        "lap message",
    );
    assert!(lap.contains("\"lap_time\":7.0"));
    assert!(lap.contains("\"lap_valid\":true"));
    Ok(())
}

#[test]
fn test_checkpoint_signal_out_of_range_is_malformed() -> TestResult {
    let h = harness(CrossingSource::CheckpointSignals)?;
    let (timer, publisher) = h.pipeline.into_parts();
    let (mut tx, rx) = unbounded();
    let (_drivers_tx, drivers_rx) = unbounded();
    let mut pipeline = TimingPipeline::new(
        timer,
        rx,
        drivers_rx,
        publisher,
        CrossingSource::CheckpointSignals,
    )
    .with_signal_format(SignalFormat::Decimal);

    tx.send(b"checkpoint 9")?;
    let result = pipeline.tick();
    assert!(matches!(result, Err(ref e) if e.is_malformed()));
    Ok(())
}

#[test]
fn test_line_sink_output_snapshot() -> TestResult {
    let config = LapTimerConfig::default();
    let clock = Arc::new(ManualClock::new());
    let timer = LapTimer::from_config(
        &config,
        &reference_definitions(),
        &StaticBestTimeArchive::default(),
        Arc::clone(&clock),
    )?;
    let (mut tx, rx) = unbounded();
    let (_drivers_tx, drivers_rx) = unbounded();
    let mut pipeline = TimingPipeline::new(
        timer,
        rx,
        drivers_rx,
        TimingPublisher::new(LineSink::new(Vec::new()), config.topics.clone()),
        CrossingSource::Positions,
    );
    pipeline.start()?;

    for sample in reference_drive().into_iter().take(8) {
        tx.send(format!("[{}, {}]", sample.point.x, sample.point.y).as_bytes())?;
        clock.set_elapsed(sample.at);
        pipeline.tick()?;
    }

    let (_, publisher) = pipeline.into_parts();
    let output = String::from_utf8(publisher.into_sink().into_inner())?;
    insta::assert_snapshot!("reference_wire_output", output.trim_end());
    Ok(())
}
