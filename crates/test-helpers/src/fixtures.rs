//! Reference track and drives.
//!
//! The reference track has three checkpoints on a small pixel grid:
//!
//! ```text
//! 0: finish line (5,5)-(6,5)
//! 1: sector 1    (3,1)-(3,2)
//! 2: sector 2    (3,3)-(3,4)
//! ```
//!
//! [`reference_drive`] is fourteen samples one second apart. With the timer
//! started at t=0 it produces two invalid laps (crossing the finish line
//! twice in a row) followed by two valid laps.

use std::time::Duration;

use laptime_track::{CheckpointDefinition, CheckpointDefinitions, Point, Segment};

/// A position sample at an offset from the timer start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveSample {
    pub at: Duration,
    pub point: Point,
}

pub fn reference_definitions() -> CheckpointDefinitions {
    CheckpointDefinitions::new(vec![
        CheckpointDefinition::new(5, 5, 6, 5),
        CheckpointDefinition::new(3, 1, 3, 2),
        CheckpointDefinition::new(3, 3, 3, 4),
    ])
}

pub fn reference_segments() -> Vec<Segment> {
    reference_definitions()
        .checkpoints
        .iter()
        .map(CheckpointDefinition::segment)
        .collect()
}

const REFERENCE_POINTS: [(f64, f64); 14] = [
    (5.5, 4.0),
    (5.5, 6.0),
    (4.0, 1.5),
    (2.0, 1.5),
    (4.0, 3.5),
    (2.0, 3.5),
    (5.0, 4.0),
    (5.0, 6.0),
    (4.0, 1.0),
    (2.0, 2.5),
    (4.0, 4.5),
    (2.0, 2.5),
    (5.2, 4.0),
    (5.8, 6.0),
];

/// Fourteen samples at t = 1s, 2s, ..., 14s.
pub fn reference_drive() -> Vec<DriveSample> {
    scripted_drive(&REFERENCE_POINTS, Duration::from_secs(1))
}

/// Samples spaced `interval` apart, the first one at `interval`.
pub fn scripted_drive(points: &[(f64, f64)], interval: Duration) -> Vec<DriveSample> {
    points
        .iter()
        .zip(1u32..)
        .map(|(&(x, y), n)| DriveSample {
            at: interval.saturating_mul(n),
            point: Point::new(x, y),
        })
        .collect()
}
