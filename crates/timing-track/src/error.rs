//! Error types for track construction and checkpoint definitions.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Track needs at least one checkpoint (index 0 is the finish line)")]
    NoCheckpoints,

    #[error("Checkpoint definitions not readable at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed checkpoint definitions: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Checkpoint definer failed: {0}")]
    Definer(String),
}

impl TrackError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrackError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn definer(msg: impl Into<String>) -> Self {
        TrackError::Definer(msg.into())
    }
}

pub type TrackResult<T> = Result<T, TrackError>;
