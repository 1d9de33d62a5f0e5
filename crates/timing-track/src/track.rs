//! Ordered checkpoint collection.

use std::time::{Duration, Instant};

use crate::checkpoint::Checkpoint;
use crate::definitions::CheckpointDefinitions;
use crate::error::{TrackError, TrackResult};
use crate::geometry::Segment;

/// Checkpoints in traversal order. Index 0 is always the only finish line.
#[derive(Debug, Clone)]
pub struct Track {
    checkpoints: Vec<Checkpoint>,
}

impl Track {
    /// Build a track from persisted definitions.
    ///
    /// The first definition becomes the finish line, the rest become sectors
    /// `1..N` in order.
    pub fn from_definitions(
        definitions: &CheckpointDefinitions,
        finish_cooldown: Duration,
    ) -> TrackResult<Self> {
        Self::from_segments(
            definitions.checkpoints.iter().map(|d| d.segment()),
            finish_cooldown,
        )
    }

    pub fn from_segments(
        segments: impl IntoIterator<Item = Segment>,
        finish_cooldown: Duration,
    ) -> TrackResult<Self> {
        let checkpoints: Vec<Checkpoint> = segments
            .into_iter()
            .enumerate()
            .map(|(index, segment)| {
                if segment.is_degenerate() {
                    tracing::warn!(index, "checkpoint segment has zero length and can never be crossed");
                }
                if index == 0 {
                    Checkpoint::finish_line(segment, finish_cooldown)
                } else {
                    Checkpoint::sector(segment, index)
                }
            })
            .collect();

        if checkpoints.is_empty() {
            return Err(TrackError::NoCheckpoints);
        }

        Ok(Self { checkpoints })
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn get(&self, index: usize) -> Option<&Checkpoint> {
        self.checkpoints.get(index)
    }

    pub fn finish_line(&self) -> Option<&Checkpoint> {
        self.checkpoints.first()
    }

    /// Sector number reported for the implicit final sector that ends at the
    /// finish line. Equal to the checkpoint count.
    pub fn final_sector_number(&self) -> u32 {
        u32::try_from(self.checkpoints.len()).unwrap_or(u32::MAX)
    }

    /// Run the crossing test for one checkpoint. Out-of-range indices never cross.
    pub fn check(&mut self, index: usize, movement: Segment, now: Instant) -> bool {
        self.checkpoints
            .get_mut(index)
            .is_some_and(|checkpoint| checkpoint.check(movement, now))
    }

    /// Fire any due finish-line re-arms.
    pub fn rearm_due(&mut self, now: Instant) {
        for checkpoint in &mut self.checkpoints {
            checkpoint.rearm_due(now);
        }
    }

    /// Whether every checkpoint is currently crossed.
    pub fn all_crossed(&self) -> bool {
        self.checkpoints.iter().all(Checkpoint::is_crossed)
    }

    /// Lap reset: every checkpoint back to `NOT_CROSSED`.
    pub fn reset_all(&mut self) {
        for checkpoint in &mut self.checkpoints {
            checkpoint.reset();
        }
    }

    /// Returns `false` if `index` is out of range.
    pub fn mark_crossed(&mut self, index: usize) -> bool {
        match self.checkpoints.get_mut(index) {
            Some(checkpoint) => {
                checkpoint.mark_crossed();
                true
            }
            None => false,
        }
    }
}
