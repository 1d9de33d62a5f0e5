//! Effective configuration for a command invocation.

use std::path::{Path, PathBuf};

use anyhow::Result;
use laptime_config::{LapTimerConfig, find_config_file};
use laptime_track::CheckpointDefinitions;

use crate::error::CliError;

/// Configuration file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "laptime.yaml";

pub struct CliContext {
    pub config: LapTimerConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    pub checkpoints_path: PathBuf,
}

impl CliContext {
    /// Load the explicit configuration file, or the first `laptime.yaml` in
    /// the search directories, or fall back to defaults.
    ///
    /// A relative `checkpoints_file` is resolved against the configuration
    /// file's directory.
    pub fn resolve(config: Option<&Path>, checkpoints: Option<&Path>) -> Result<Self> {
        let config_path = match config {
            Some(path) if path.is_file() => Some(path.to_path_buf()),
            Some(path) => {
                return Err(CliError::InvalidConfiguration(format!(
                    "configuration file {} does not exist",
                    path.display()
                ))
                .into());
            }
            None => find_config_file(DEFAULT_CONFIG_FILE),
        };

        let config = match &config_path {
            Some(path) => LapTimerConfig::load(path).map_err(CliError::from)?,
            None => LapTimerConfig::default(),
        };
        tracing::debug!(
            config = ?config_path.as_deref().map(Path::display),
            "configuration resolved"
        );

        let base = config_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty());
        let checkpoints_path = checkpoints
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.checkpoints_path(base));

        Ok(Self {
            config,
            config_path,
            checkpoints_path,
        })
    }

    /// Load the checkpoint definitions without prompting.
    pub fn load_checkpoints(&self) -> Result<CheckpointDefinitions> {
        if !self.checkpoints_path.is_file() {
            return Err(CliError::CheckpointsNotFound(self.checkpoints_path.clone()).into());
        }
        Ok(CheckpointDefinitions::load(&self.checkpoints_path).map_err(CliError::from)?)
    }
}
