//! Command implementations for laptimectl

pub mod checkpoints;
pub mod config;
pub mod replay;
pub mod run;

use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Record the session to this file for later replay
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Log and skip malformed input lines instead of stopping
    #[arg(long)]
    pub skip_malformed: bool,

    /// Description stored with the recording
    #[arg(long, requires = "record")]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Recording file written by `run --record`
    pub file: PathBuf,

    /// Print a lap summary instead of the timing messages
    #[arg(long)]
    pub summary: bool,
}

#[derive(Subcommand, Debug)]
pub enum CheckpointCommands {
    /// Show the checkpoint definitions
    Show {
        /// Print the definitions file as JSON
        #[arg(long)]
        json: bool,
    },

    /// Define checkpoints interactively and save them
    Define {
        /// Overwrite an existing file without confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show {
        /// Print as JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
}
