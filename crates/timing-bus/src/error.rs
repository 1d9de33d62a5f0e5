//! Transport and codec errors.

use laptime_core::TimingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BusError {
    /// The peer hung up; no more messages will arrive.
    #[error("Transport closed")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Message is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed message: {0}")]
    Decode(String),

    #[error("Timing error: {0}")]
    Timing(#[from] TimingError),
}

impl BusError {
    pub fn decode(msg: impl Into<String>) -> Self {
        BusError::Decode(msg.into())
    }

    /// Whether the error came from a bad inbound message rather than the
    /// transport itself.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            BusError::Utf8(_)
                | BusError::Json(_)
                | BusError::Decode(_)
                | BusError::Timing(TimingError::UnknownCheckpoint { .. })
        )
    }
}

pub type BusResult<T> = Result<T, BusError>;
