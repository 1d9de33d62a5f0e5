//! Lap and sector timing for a position stream crossing track checkpoints.
//!
//! ## Modules
//! - `clock` - Time sources (`SystemClock`, `ManualClock`)
//! - `best_times` - Best-time tables and the purple/green/yellow classifier
//! - `archive` - All-time best lookup
//! - `events` - Sector, lap and lap-start events
//! - `lap_timer` - The per-sample orchestrator

#![deny(static_mut_refs)]

pub mod archive;
pub mod best_times;
pub mod clock;
pub mod error;
pub mod events;
pub mod lap_timer;

pub use archive::{BestTimeArchive, StaticBestTimeArchive};
pub use best_times::{BestTimeBoard, BestTimes, Slot, Tier, classify};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{TimingError, TimingResult};
pub use events::{LapEvent, LapStartEvent, SectorEvent, TimingEvent};
pub use lap_timer::{LapState, LapTimer, round_centis};
