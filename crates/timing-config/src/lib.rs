//! Runtime configuration for the lap timing service.
//!
//! This crate combines:
//! - Lap timer settings (topics, cooldown, sentinels, checkpoint file)
//! - Configuration file discovery

pub mod error;
pub mod search;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use search::{find_config_file, find_config_file_in, search_directories};
pub use settings::{
    CrossingSource, DEFAULT_ANONYMOUS_DRIVER, DEFAULT_CHECKPOINTS_FILE,
    DEFAULT_FINISH_COOLDOWN_SECS, DEFAULT_PERSONAL_BEST_SENTINEL, LapTimerConfig, TopicSettings,
};
