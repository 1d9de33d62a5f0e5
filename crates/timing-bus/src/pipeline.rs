//! The synchronous processing loop.
//!
//! One tick blocks for the next crossing input (a position sample or a
//! checkpoint signal), evaluates it, publishes the resulting events, then
//! polls the driver feed once without blocking. A decode failure ends the
//! tick with an error; whether to skip or stop is the caller's decision.

use laptime_config::CrossingSource;
use laptime_core::{Clock, LapTimer};

use crate::codec::{decode_checkpoint_signal, decode_checkpoint_text, decode_driver, decode_position};
use crate::error::{BusError, BusResult};
use crate::publisher::TimingPublisher;
use crate::transport::{MessageSink, MessageSource};

/// Encoding of checkpoint signal payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalFormat {
    /// Whole message is a big-endian unsigned integer.
    #[default]
    BigEndian,
    /// Decimal text, optionally after a topic.
    Decimal,
}

/// What [`TimingPipeline::run`] does with a malformed inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Return the error and stop.
    #[default]
    Fail,
    /// Log it and continue with the next message.
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub ticks: u64,
    pub events: u64,
    pub driver_changes: u64,
    pub skipped: u64,
}

pub struct TimingPipeline<C, I, D, O>
where
    C: Clock,
    I: MessageSource,
    D: MessageSource,
    O: MessageSink,
{
    timer: LapTimer<C>,
    crossings: I,
    drivers: D,
    publisher: TimingPublisher<O>,
    crossing_source: CrossingSource,
    signal_format: SignalFormat,
    driver_feed_open: bool,
    stats: PipelineStats,
}

impl<C, I, D, O> TimingPipeline<C, I, D, O>
where
    C: Clock,
    I: MessageSource,
    D: MessageSource,
    O: MessageSink,
{
    pub fn new(
        timer: LapTimer<C>,
        crossings: I,
        drivers: D,
        publisher: TimingPublisher<O>,
        crossing_source: CrossingSource,
    ) -> Self {
        Self {
            timer,
            crossings,
            drivers,
            publisher,
            crossing_source,
            signal_format: SignalFormat::default(),
            driver_feed_open: true,
            stats: PipelineStats::default(),
        }
    }

    pub fn with_signal_format(mut self, format: SignalFormat) -> Self {
        self.signal_format = format;
        self
    }

    /// Start the timer and publish the opening best-time snapshot.
    pub fn start(&mut self) -> BusResult<()> {
        let event = self.timer.start();
        self.publisher.publish(&event)?;
        self.stats.events = self.stats.events.saturating_add(1);
        Ok(())
    }

    /// Process one crossing input and poll the driver feed.
    ///
    /// # Errors
    ///
    /// [`BusError::Closed`] when the crossing input has ended, a decode error
    /// for a malformed message, or a publish failure.
    pub fn tick(&mut self) -> BusResult<()> {
        let message = self.crossings.recv()?;
        self.stats.ticks = self.stats.ticks.saturating_add(1);

        let events = match self.crossing_source {
            CrossingSource::Positions => {
                let point = decode_position(&message)?;
                self.timer.on_position(point)
            }
            CrossingSource::CheckpointSignals => {
                let number = match self.signal_format {
                    SignalFormat::BigEndian => decode_checkpoint_signal(&message)?,
                    SignalFormat::Decimal => decode_checkpoint_text(&message)?,
                };
                self.timer.on_checkpoint_signal(number)?
            }
        };

        self.publisher.publish_all(&events)?;
        self.stats.events = self
            .stats
            .events
            .saturating_add(u64::try_from(events.len()).unwrap_or(u64::MAX));

        self.poll_driver()
    }

    /// Apply at most one pending driver change.
    pub fn poll_driver(&mut self) -> BusResult<()> {
        if !self.driver_feed_open {
            return Ok(());
        }
        match self.drivers.try_recv() {
            Ok(Some(message)) => {
                let driver = decode_driver(&message)?;
                self.timer.change_driver(driver);
                self.stats.driver_changes = self.stats.driver_changes.saturating_add(1);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(BusError::Closed) => {
                tracing::debug!("driver feed closed");
                self.driver_feed_open = false;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Tick until the crossing input closes.
    ///
    /// Starts the timer first if nobody has. A closed input ends the loop
    /// with `Ok`.
    pub fn run(&mut self, policy: MalformedPolicy) -> BusResult<PipelineStats> {
        if !self.timer.is_started() {
            self.start()?;
        }

        loop {
            match self.tick() {
                Ok(()) => {}
                Err(BusError::Closed) => {
                    tracing::info!(
                        ticks = self.stats.ticks,
                        laps = self.timer.laps_completed(),
                        "input closed, stopping"
                    );
                    return Ok(self.stats);
                }
                Err(e) if policy == MalformedPolicy::Skip && e.is_malformed() => {
                    self.stats.skipped = self.stats.skipped.saturating_add(1);
                    tracing::warn!(error = %e, "skipping malformed message");
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub fn timer(&self) -> &LapTimer<C> {
        &self.timer
    }

    pub fn publisher(&self) -> &TimingPublisher<O> {
        &self.publisher
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn into_parts(self) -> (LapTimer<C>, TimingPublisher<O>) {
        (self.timer, self.publisher)
    }
}
