//! Track model for lap timing.
//!
//! This crate holds everything that is purely spatial or per-checkpoint:
//!
//! ## Modules
//! - `geometry` - `Point`, `Segment` and the segment intersection test
//! - `checkpoint` - Checkpoint crossing state machine and re-arm policies
//! - `track` - Ordered checkpoint collection with the finish line at index 0
//! - `window` - Two-sample movement window
//! - `definitions` - Persisted checkpoint definitions and the definer hook

#![deny(static_mut_refs)]

pub mod checkpoint;
pub mod definitions;
pub mod error;
pub mod geometry;
pub mod track;
pub mod window;

pub use checkpoint::{Checkpoint, CheckpointKind, DEFAULT_FINISH_COOLDOWN, RearmPolicy};
pub use definitions::{
    CheckpointDefiner, CheckpointDefinition, CheckpointDefinitions, load_or_define,
};
pub use error::{TrackError, TrackResult};
pub use geometry::{Point, Segment, intersects, line_intersection, segment_intersection};
pub use track::Track;
pub use window::MovementWindow;
