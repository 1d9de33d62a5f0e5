//! Checkpoint definition commands.

use anyhow::Result;
use dialoguer::Confirm;
use laptime_track::CheckpointDefiner;

use crate::commands::CheckpointCommands;
use crate::context::CliContext;
use crate::error::CliError;
use crate::output;
use crate::prompt::PromptDefiner;

/// Execute checkpoint command.
pub fn execute(cmd: &CheckpointCommands, ctx: &CliContext) -> Result<()> {
    match cmd {
        CheckpointCommands::Show { json } => show(ctx, *json),
        CheckpointCommands::Define { force } => define(ctx, *force),
    }
}

fn show(ctx: &CliContext, json: bool) -> Result<()> {
    let definitions = ctx.load_checkpoints()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&definitions)?);
    } else {
        println!("{}", ctx.checkpoints_path.display());
        output::print_checkpoints(&definitions);
    }
    Ok(())
}

fn define(ctx: &CliContext, force: bool) -> Result<()> {
    let path = &ctx.checkpoints_path;
    if path.exists()
        && !force
        && !Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", path.display()))
            .default(false)
            .interact()?
    {
        println!("Checkpoint definitions left unchanged");
        return Ok(());
    }

    let definitions = PromptDefiner::new().define().map_err(CliError::from)?;
    definitions.save(path).map_err(CliError::from)?;
    output::print_success(&format!(
        "Saved {} checkpoints to {}",
        definitions.len(),
        path.display()
    ));
    Ok(())
}
