//! Error types for laptimectl

use std::path::PathBuf;

use laptime_bus::BusError;
use laptime_config::ConfigError;
use laptime_track::TrackError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Checkpoint definitions not found: {}", .0.display())]
    CheckpointsNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Checkpoint error: {0}")]
    Track(#[from] TrackError),

    #[error("Transport error: {0}")]
    Bus(BusError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<BusError> for CliError {
    fn from(error: BusError) -> Self {
        if error.is_malformed() {
            CliError::MalformedInput(error.to_string())
        } else {
            CliError::Bus(error)
        }
    }
}
