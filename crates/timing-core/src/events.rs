//! Timing events emitted by the lap timer.
//!
//! Field names match the published JSON objects, so an event serializes
//! straight to its wire body.

use serde::{Deserialize, Serialize};

use crate::best_times::{BestTimes, Tier};

/// A sector finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorEvent {
    #[serde(rename = "current_driver")]
    pub driver: String,
    pub sector_number: u32,
    /// Seconds, rounded to two decimals.
    pub sector_time: f64,
    pub sector_valid: bool,
    #[serde(rename = "type")]
    pub tier: Tier,
}

/// A lap finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapEvent {
    #[serde(rename = "current_driver")]
    pub driver: String,
    /// Seconds, rounded to two decimals.
    pub lap_time: f64,
    /// Whether every checkpoint was crossed during the lap.
    pub lap_valid: bool,
    #[serde(rename = "type")]
    pub tier: Tier,
}

/// All-time best snapshot sent when a lap starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LapStartEvent {
    pub best_times: BestTimes,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimingEvent {
    Sector(SectorEvent),
    Lap(LapEvent),
    LapStart(LapStartEvent),
}

impl TimingEvent {
    pub fn as_sector(&self) -> Option<&SectorEvent> {
        match self {
            TimingEvent::Sector(event) => Some(event),
            _ => None,
        }
    }

    pub fn as_lap(&self) -> Option<&LapEvent> {
        match self {
            TimingEvent::Lap(event) => Some(event),
            _ => None,
        }
    }

    pub fn is_lap_start(&self) -> bool {
        matches!(self, TimingEvent::LapStart(_))
    }
}

impl From<SectorEvent> for TimingEvent {
    fn from(event: SectorEvent) -> Self {
        TimingEvent::Sector(event)
    }
}

impl From<LapEvent> for TimingEvent {
    fn from(event: LapEvent) -> Self {
        TimingEvent::Lap(event)
    }
}

impl From<LapStartEvent> for TimingEvent {
    fn from(event: LapStartEvent) -> Self {
        TimingEvent::LapStart(event)
    }
}
