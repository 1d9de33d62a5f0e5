//! Interactive checkpoint definition.

use dialoguer::Input;
use laptime_track::{CheckpointDefiner, CheckpointDefinition, CheckpointDefinitions, TrackError, TrackResult};

/// Asks for each checkpoint line on the terminal, finish line first.
#[derive(Debug, Default)]
pub struct PromptDefiner;

impl PromptDefiner {
    pub fn new() -> Self {
        Self
    }
}

impl CheckpointDefiner for PromptDefiner {
    fn define(&mut self) -> TrackResult<CheckpointDefinitions> {
        eprintln!("Define checkpoint lines in pixel coordinates as `x1,y1,x2,y2`.");
        eprintln!("The first line is the finish line; the rest are sectors in driving order.");

        let count: usize = Input::new()
            .with_prompt("Number of checkpoints")
            .default(3)
            .validate_with(|n: &usize| {
                if *n > 0 {
                    Ok(())
                } else {
                    Err("at least the finish line is required")
                }
            })
            .interact_text()
            .map_err(|e| TrackError::definer(e.to_string()))?;

        let mut checkpoints = Vec::with_capacity(count);
        for index in 0..count {
            let prompt = if index == 0 {
                "Finish line".to_string()
            } else {
                format!("Sector {index}")
            };
            let line: String = Input::new()
                .with_prompt(prompt)
                .validate_with(|text: &String| parse_checkpoint_line(text).map(|_| ()))
                .interact_text()
                .map_err(|e| TrackError::definer(e.to_string()))?;
            checkpoints.push(parse_checkpoint_line(&line).map_err(TrackError::definer)?);
        }

        Ok(CheckpointDefinitions::new(checkpoints))
    }
}

/// Parse `x1,y1,x2,y2` (commas and/or whitespace between the numbers).
pub fn parse_checkpoint_line(text: &str) -> Result<CheckpointDefinition, String> {
    let numbers = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i32>()
                .map_err(|e| format!("'{part}' is not a whole number: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match numbers.as_slice() {
        [x1, y1, x2, y2] => {
            if (x1, y1) == (x2, y2) {
                return Err("the two end points must differ".to_string());
            }
            Ok(CheckpointDefinition::new(*x1, *y1, *x2, *y2))
        }
        other => Err(format!("expected 4 numbers, got {}", other.len())),
    }
}
