//! laptimectl - lap timing from the command line
//!
//! Reads position samples (or checkpoint signals) and driver changes as
//! lines on stdin and writes sector, lap and lap-start messages to stdout.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod context;
mod error;
mod output;
mod prompt;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{CheckpointCommands, ConfigCommands, ReplayArgs, RunArgs};
use crate::context::CliContext;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "laptimectl")]
#[command(about = "Lap timing - sector and lap times from positions crossing checkpoints")]
#[command(version)]
#[command(long_about = "
laptimectl times laps from a stream of position samples crossing hand-drawn
checkpoint lines. Input arrives as newline-delimited messages on stdin;
timing messages are written to stdout as `<topic> <json>` lines.

Logs go to stderr. Use -v (repeatable) or RUST_LOG to raise verbosity.
")]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (YAML or JSON)
    #[arg(long, global = true, env = "LAPTIME_CONFIG")]
    config: Option<PathBuf>,

    /// Checkpoint definitions file, overriding the configured one
    #[arg(long, global = true)]
    checkpoints: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Time a live session from stdin
    Run(RunArgs),

    /// Replay a recorded session and print its timing messages
    Replay(ReplayArgs),

    /// Checkpoint definition commands
    #[command(subcommand)]
    Checkpoints(CheckpointCommands),

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_unset| format!("laptime={log_level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error_human(&e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    let ctx = CliContext::resolve(cli.config.as_deref(), cli.checkpoints.as_deref())?;
    match &cli.command {
        Commands::Run(args) => commands::run::execute(args, &ctx),
        Commands::Replay(args) => commands::replay::execute(args, &ctx),
        Commands::Checkpoints(cmd) => commands::checkpoints::execute(cmd, &ctx),
        Commands::Config(cmd) => commands::config::execute(cmd, &ctx),
    }
}

fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<CliError>() {
        Some(CliError::CheckpointsNotFound(_)) => 2,
        Some(CliError::InvalidConfiguration(_) | CliError::Config(_)) => 3,
        Some(CliError::MalformedInput(_)) => 4,
        Some(CliError::Track(_)) => 5,
        _ => 1,
    }
}
