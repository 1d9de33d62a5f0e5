//! Lap timer settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

pub const DEFAULT_CHECKPOINTS_FILE: &str = "time_tracking.json";
pub const DEFAULT_FINISH_COOLDOWN_SECS: f64 = 2.0;
pub const DEFAULT_ANONYMOUS_DRIVER: &str = "anon";
pub const DEFAULT_PERSONAL_BEST_SENTINEL: f64 = 1000.0;

/// Where crossing decisions come from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrossingSource {
    /// Raw `[x, y]` position samples; crossings are detected locally.
    #[default]
    Positions,
    /// An upstream detector publishes the crossed checkpoint number directly.
    CheckpointSignals,
}

/// Topic names for inbound and outbound messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TopicSettings {
    pub positions: String,
    pub driver: String,
    pub sector_finished: String,
    pub lap_finished: String,
    pub lap_start: String,
}

impl Default for TopicSettings {
    fn default() -> Self {
        Self {
            positions: "pixel_coordinates".to_string(),
            driver: "current_driver".to_string(),
            sector_finished: "sector_finished".to_string(),
            lap_finished: "lap_finished".to_string(),
            lap_start: "lap_start".to_string(),
        }
    }
}

impl TopicSettings {
    fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("positions", &self.positions),
            ("driver", &self.driver),
            ("sector_finished", &self.sector_finished),
            ("lap_finished", &self.lap_finished),
            ("lap_start", &self.lap_start),
        ]
    }
}

/// Top-level lap timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LapTimerConfig {
    /// Persisted checkpoint definitions.
    pub checkpoints_file: PathBuf,
    /// Delay before a crossed finish line is forced back to not-crossed.
    pub finish_cooldown_secs: f64,
    /// Driver name used until a driver change arrives.
    pub anonymous_driver: String,
    /// Value every personal best is reset to on driver change.
    pub personal_best_sentinel: f64,
    pub crossing_source: CrossingSource,
    pub topics: TopicSettings,
}

impl Default for LapTimerConfig {
    fn default() -> Self {
        Self {
            checkpoints_file: PathBuf::from(DEFAULT_CHECKPOINTS_FILE),
            finish_cooldown_secs: DEFAULT_FINISH_COOLDOWN_SECS,
            anonymous_driver: DEFAULT_ANONYMOUS_DRIVER.to_string(),
            personal_best_sentinel: DEFAULT_PERSONAL_BEST_SENTINEL,
            crossing_source: CrossingSource::default(),
            topics: TopicSettings::default(),
        }
    }
}

impl LapTimerConfig {
    /// Load from YAML (`.yaml`/`.yml`) or JSON (anything else) and validate.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

        let config: Self = if is_yaml(path) {
            serde_yaml::from_str(&raw)?
        } else {
            serde_json::from_str(&raw)?
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded lap timer configuration");
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.finish_cooldown_secs.is_finite() || self.finish_cooldown_secs < 0.0 {
            return Err(ConfigError::invalid(format!(
                "finish_cooldown_secs must be a non-negative number, got {}",
                self.finish_cooldown_secs
            )));
        }

        if !self.personal_best_sentinel.is_finite() || self.personal_best_sentinel <= 0.0 {
            return Err(ConfigError::invalid(format!(
                "personal_best_sentinel must be a positive number, got {}",
                self.personal_best_sentinel
            )));
        }

        for (name, topic) in self.topics.entries() {
            if topic.is_empty() {
                return Err(ConfigError::invalid(format!("topic '{name}' is empty")));
            }
            if topic.chars().any(char::is_whitespace) {
                return Err(ConfigError::invalid(format!(
                    "topic '{name}' contains whitespace: {topic:?}"
                )));
            }
        }

        Ok(())
    }

    pub fn finish_cooldown(&self) -> Duration {
        Duration::try_from_secs_f64(self.finish_cooldown_secs).unwrap_or(Duration::ZERO)
    }

    /// Resolve `checkpoints_file` against `base` when it is relative.
    pub fn checkpoints_path(&self, base: Option<&Path>) -> PathBuf {
        match base {
            Some(base) if self.checkpoints_file.is_relative() => base.join(&self.checkpoints_file),
            _ => self.checkpoints_file.clone(),
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}
