//! Session recording and deterministic replay.
//!
//! A recording is a pretty-printed JSON file holding the inbound inputs of
//! one timing session (position samples, checkpoint signals and driver
//! changes), each stamped with its offset from the session start. Replaying
//! it drives a [`laptime_core::LapTimer`] on a manual clock, so the same file
//! always yields the same events.

#![deny(static_mut_refs)]

pub mod replay;
pub mod session;
pub mod tap;

pub use replay::replay;
pub use session::{RecordedInput, RecordingMetadata, SessionEntry, SessionRecorder, SessionRecording};
pub use tap::{RecordingTap, SharedRecorder, TapKind};
