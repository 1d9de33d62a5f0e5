//! Lap and sector timing orchestration.
//!
//! [`LapTimer`] owns the track, the movement window, the lap state and the
//! best-time board. Each position sample is evaluated against every
//! checkpoint in track order:
//!
//! - the finish line completes a lap: a sector event for the final sector,
//!   a lap event, a reset of every checkpoint, then a lap-start snapshot of
//!   the all-time bests;
//! - any other checkpoint emits a sector event.
//!
//! Sector times run from the previous sector or lap event (or the timer start)
//! and lap times from the previous lap (or the timer start), both rounded to
//! two decimals.

use std::time::{Duration, Instant};

use laptime_config::LapTimerConfig;
use laptime_track::{CheckpointDefinitions, MovementWindow, Point, Track};

use crate::archive::BestTimeArchive;
use crate::best_times::{BestTimeBoard, BestTimes, Slot};
use crate::clock::Clock;
use crate::error::{TimingError, TimingResult};
use crate::events::{LapEvent, LapStartEvent, SectorEvent, TimingEvent};

/// Timestamps and driver for the lap in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LapState {
    pub start_time: Option<Instant>,
    pub last_lap_time: Option<Instant>,
    pub last_checkpoint_time: Option<Instant>,
    pub driver: String,
    pub laps_completed: u32,
}

impl LapState {
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            start_time: None,
            last_lap_time: None,
            last_checkpoint_time: None,
            driver: driver.into(),
            laps_completed: 0,
        }
    }

    fn sector_baseline(&self) -> Option<Instant> {
        self.last_checkpoint_time.or(self.start_time)
    }

    fn lap_baseline(&self) -> Option<Instant> {
        self.last_lap_time.or(self.start_time)
    }
}

pub struct LapTimer<C: Clock> {
    track: Track,
    window: MovementWindow,
    state: LapState,
    board: BestTimeBoard,
    clock: C,
}

impl<C: Clock> LapTimer<C> {
    pub fn new(track: Track, board: BestTimeBoard, driver: impl Into<String>, clock: C) -> Self {
        Self {
            track,
            window: MovementWindow::new(),
            state: LapState::new(driver),
            board,
            clock,
        }
    }

    /// Build a timer from configuration, persisted checkpoints and the archive.
    ///
    /// # Errors
    ///
    /// Fails when the definitions are empty or the archive lookup fails.
    pub fn from_config(
        config: &LapTimerConfig,
        definitions: &CheckpointDefinitions,
        archive: &dyn BestTimeArchive,
        clock: C,
    ) -> TimingResult<Self> {
        let track = Track::from_definitions(definitions, config.finish_cooldown())?;
        let sector_count = track.final_sector_number();
        let all_time = archive.request_best_times(sector_count)?;
        let board = BestTimeBoard::new(all_time, sector_count, config.personal_best_sentinel);

        tracing::info!(
            checkpoints = track.len(),
            cooldown = ?config.finish_cooldown(),
            driver = %config.anonymous_driver,
            "lap timer ready"
        );
        Ok(Self::new(track, board, config.anonymous_driver.clone(), clock))
    }

    /// Start timing and return the lap-start snapshot.
    pub fn start(&mut self) -> TimingEvent {
        let now = self.clock.now();
        self.state.start_time = Some(now);
        tracing::info!(driver = %self.state.driver, "timer started");
        self.lap_start_event()
    }

    pub fn is_started(&self) -> bool {
        self.state.start_time.is_some()
    }

    /// Feed one position sample.
    ///
    /// A sample arriving before [`start`](Self::start) starts the timer and
    /// the returned events begin with the lap-start snapshot.
    pub fn on_position(&mut self, point: Point) -> Vec<TimingEvent> {
        let mut events = Vec::new();
        if !self.is_started() {
            events.push(self.start());
        }

        let now = self.clock.now();
        let Some(movement) = self.window.push(point) else {
            return events;
        };

        for index in 0..self.track.len() {
            if !self.track.check(index, movement, now) {
                continue;
            }

            let is_finish = self
                .track
                .get(index)
                .is_some_and(|checkpoint| checkpoint.is_finish_line());
            if is_finish {
                let valid = self.track.all_crossed();
                let final_sector = self.track.final_sector_number();
                events.push(self.sector_event(final_sector, now));
                self.complete_lap(now, valid, &mut events);
            } else {
                let number = u32::try_from(index).unwrap_or(u32::MAX);
                events.push(self.sector_event(number, now));
            }
        }

        events
    }

    /// Feed a checkpoint number from an external crossing detector.
    ///
    /// Numbers `1..N-1` finish that sector, `N` (the checkpoint count) is the
    /// finish line and completes the lap.
    ///
    /// # Errors
    ///
    /// [`TimingError::UnknownCheckpoint`] for `0` or anything above `N`.
    pub fn on_checkpoint_signal(&mut self, number: u32) -> TimingResult<Vec<TimingEvent>> {
        let count = self.track.final_sector_number();
        if number == 0 || number > count {
            return Err(TimingError::UnknownCheckpoint { number, count });
        }

        let mut events = Vec::new();
        if !self.is_started() {
            events.push(self.start());
        }

        let now = self.clock.now();
        events.push(self.sector_event(number, now));

        if number < count {
            let index = usize::try_from(number).unwrap_or(usize::MAX);
            self.track.mark_crossed(index);
        } else {
            self.track.mark_crossed(0);
            let valid = self.track.all_crossed();
            self.complete_lap(now, valid, &mut events);
        }

        Ok(events)
    }

    /// Switch the active driver and reset personal bests.
    ///
    /// The lap in progress keeps its timestamps.
    pub fn change_driver(&mut self, driver: impl Into<String>) {
        let driver = driver.into();
        tracing::info!(from = %self.state.driver, to = %driver, "driver changed");
        self.state.driver = driver;
        self.board.reset_personal();
    }

    pub fn driver(&self) -> &str {
        &self.state.driver
    }

    pub fn state(&self) -> &LapState {
        &self.state
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn board(&self) -> &BestTimeBoard {
        &self.board
    }

    pub fn all_time_bests(&self) -> &BestTimes {
        self.board.all_time()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn laps_completed(&self) -> u32 {
        self.state.laps_completed
    }

    fn sector_event(&mut self, number: u32, now: Instant) -> TimingEvent {
        let sector_time = elapsed_secs(self.state.sector_baseline(), now);
        self.state.last_checkpoint_time = Some(now);

        let tier = self.board.classify(sector_time, Slot::Sector(number), true);
        tracing::debug!(sector = number, sector_time, %tier, "sector finished");

        SectorEvent {
            driver: self.state.driver.clone(),
            sector_number: number,
            sector_time,
            sector_valid: true,
            tier,
        }
        .into()
    }

    fn complete_lap(&mut self, now: Instant, valid: bool, events: &mut Vec<TimingEvent>) {
        let lap_time = elapsed_secs(self.state.lap_baseline(), now);
        self.state.last_lap_time = Some(now);
        self.track.reset_all();

        let tier = self.board.classify(lap_time, Slot::Lap, valid);
        self.state.laps_completed = self.state.laps_completed.saturating_add(1);
        tracing::info!(
            driver = %self.state.driver,
            lap = self.state.laps_completed,
            lap_time,
            valid,
            %tier,
            "lap finished"
        );

        events.push(
            LapEvent {
                driver: self.state.driver.clone(),
                lap_time,
                lap_valid: valid,
                tier,
            }
            .into(),
        );
        events.push(self.lap_start_event());
    }

    fn lap_start_event(&self) -> TimingEvent {
        LapStartEvent {
            best_times: self.board.all_time().clone(),
        }
        .into()
    }
}

fn elapsed_secs(since: Option<Instant>, now: Instant) -> f64 {
    let elapsed = since.map_or(Duration::ZERO, |since| now.saturating_duration_since(since));
    round_centis(elapsed.as_secs_f64())
}

/// Round to two decimal places.
pub fn round_centis(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}
