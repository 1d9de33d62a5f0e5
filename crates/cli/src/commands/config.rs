//! Configuration commands.

use anyhow::Result;

use crate::commands::ConfigCommands;
use crate::context::CliContext;
use crate::error::CliError;

/// Execute config command.
pub fn execute(cmd: &ConfigCommands, ctx: &CliContext) -> Result<()> {
    match cmd {
        ConfigCommands::Show { json } => show(ctx, *json),
    }
}

fn show(ctx: &CliContext, json: bool) -> Result<()> {
    match &ctx.config_path {
        Some(path) => tracing::info!(path = %path.display(), "configuration file"),
        None => tracing::info!("no configuration file found, using defaults"),
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&ctx.config)?);
    } else {
        print!("{}", ctx.config.to_yaml_string().map_err(CliError::from)?);
    }
    Ok(())
}
