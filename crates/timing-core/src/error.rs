//! Lap timer errors.

use laptime_track::TrackError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimingError {
    #[error("Track error: {0}")]
    Track(#[from] TrackError),

    #[error("Unknown checkpoint {number}, track has {count} checkpoints")]
    UnknownCheckpoint { number: u32, count: u32 },

    #[error("Best-time archive error: {0}")]
    Archive(String),
}

pub type TimingResult<T> = Result<T, TimingError>;
