//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use laptime_core::{Tier, TimingEvent};
use laptime_track::CheckpointDefinitions;

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

fn tier_label(tier: Tier) -> ColoredString {
    match tier {
        Tier::Purple => tier.as_str().purple(),
        Tier::Green => tier.as_str().green(),
        Tier::Yellow => tier.as_str().yellow(),
    }
}

/// Print checkpoint definitions as a table, finish line first
pub fn print_checkpoints(definitions: &CheckpointDefinitions) {
    if definitions.checkpoints.is_empty() {
        println!("{}", "No checkpoints defined".yellow());
        return;
    }

    println!("{}", "Checkpoints:".bold());
    for (index, checkpoint) in definitions.checkpoints.iter().enumerate() {
        let role = if index == 0 {
            "finish line".to_string()
        } else {
            format!("sector {index}")
        };
        println!(
            "  {index:>2}  {:<12} ({}, {}) -> ({}, {})",
            role, checkpoint.x1, checkpoint.y1, checkpoint.x2, checkpoint.y2
        );
    }
}

/// Print one line per completed lap with its sectors
pub fn print_lap_summary(events: &[TimingEvent]) {
    let mut sectors: Vec<String> = Vec::new();
    let mut lap_number = 0u32;

    for event in events {
        match event {
            TimingEvent::Sector(sector) => {
                sectors.push(format!(
                    "S{} {:.2} {}",
                    sector.sector_number,
                    sector.sector_time,
                    tier_label(sector.tier)
                ));
            }
            TimingEvent::Lap(lap) => {
                lap_number = lap_number.saturating_add(1);
                let validity = if lap.lap_valid {
                    "valid".normal()
                } else {
                    "invalid".dimmed()
                };
                println!(
                    "Lap {lap_number:>3}  {:>8.2}  {}  {}  {}  [{}]",
                    lap.lap_time,
                    tier_label(lap.tier),
                    validity,
                    lap.driver,
                    sectors.join(", ")
                );
                sectors.clear();
            }
            TimingEvent::LapStart(_) => {}
        }
    }

    if lap_number == 0 {
        println!("{}", "No laps completed".yellow());
    }
}
