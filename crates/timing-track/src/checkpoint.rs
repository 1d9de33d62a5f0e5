//! Checkpoint crossing state machine.
//!
//! Every checkpoint starts `NOT_CROSSED`. A successful geometry test moves it
//! to `CROSSED`; further tests are no-ops until it is re-armed. How a
//! checkpoint is re-armed depends on its kind, see [`CheckpointKind::rearm_policy`].

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::geometry::{Segment, intersects};

/// Default finish-line cooldown before the crossed flag is forced back.
pub const DEFAULT_FINISH_COOLDOWN: Duration = Duration::from_secs(2);

/// Role of a checkpoint on the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckpointKind {
    /// Index 0: ends one lap and starts the next.
    FinishLine,
    /// Index 1..N: intermediate sector lines in traversal order.
    Sector,
}

/// How a crossed checkpoint returns to `NOT_CROSSED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RearmPolicy {
    /// Only an explicit lap reset clears the flag.
    OnLapReset,
    /// Each crossing schedules a forced reset after the cooldown. Scheduled
    /// resets are never cancelled and may clear a later crossing.
    AfterCooldown(Duration),
}

impl CheckpointKind {
    /// Behavior table keyed by kind.
    pub const fn rearm_policy(self, cooldown: Duration) -> RearmPolicy {
        match self {
            CheckpointKind::FinishLine => RearmPolicy::AfterCooldown(cooldown),
            CheckpointKind::Sector => RearmPolicy::OnLapReset,
        }
    }
}

/// A single line segment the vehicle must cross.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    segment: Segment,
    index: usize,
    kind: CheckpointKind,
    policy: RearmPolicy,
    crossed: bool,
    pending_rearms: VecDeque<Instant>,
}

impl Checkpoint {
    pub fn finish_line(segment: Segment, cooldown: Duration) -> Self {
        Self::with_kind(segment, 0, CheckpointKind::FinishLine, cooldown)
    }

    pub fn sector(segment: Segment, index: usize) -> Self {
        Self::with_kind(segment, index, CheckpointKind::Sector, Duration::ZERO)
    }

    fn with_kind(segment: Segment, index: usize, kind: CheckpointKind, cooldown: Duration) -> Self {
        Self {
            segment,
            index,
            kind,
            policy: kind.rearm_policy(cooldown),
            crossed: false,
            pending_rearms: VecDeque::new(),
        }
    }

    pub fn segment(&self) -> Segment {
        self.segment
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> CheckpointKind {
        self.kind
    }

    pub fn policy(&self) -> RearmPolicy {
        self.policy
    }

    pub fn is_finish_line(&self) -> bool {
        self.kind == CheckpointKind::FinishLine
    }

    pub fn is_crossed(&self) -> bool {
        self.crossed
    }

    /// Number of scheduled re-arms that have not fired yet.
    pub fn pending_rearms(&self) -> usize {
        self.pending_rearms.len()
    }

    /// Fire every scheduled re-arm whose deadline is at or before `now`.
    pub fn rearm_due(&mut self, now: Instant) {
        while let Some(deadline) = self.pending_rearms.front().copied() {
            if deadline > now {
                break;
            }
            self.pending_rearms.pop_front();
            if self.crossed {
                tracing::trace!(index = self.index, "checkpoint re-armed after cooldown");
            }
            self.crossed = false;
        }
    }

    /// Test `movement` against this checkpoint.
    ///
    /// Returns `true` only on the `NOT_CROSSED -> CROSSED` transition.
    pub fn check(&mut self, movement: Segment, now: Instant) -> bool {
        self.rearm_due(now);

        if self.crossed || !intersects(movement, self.segment) {
            return false;
        }

        self.crossed = true;
        if let RearmPolicy::AfterCooldown(cooldown) = self.policy {
            self.pending_rearms
                .push_back(now.checked_add(cooldown).unwrap_or(now));
        }
        true
    }

    /// Force the crossed flag without a geometry test.
    pub fn mark_crossed(&mut self) {
        self.crossed = true;
    }

    /// Lap reset: back to `NOT_CROSSED`. Pending re-arms stay scheduled.
    pub fn reset(&mut self) {
        self.crossed = false;
    }
}
