//! Convenience re-exports for common test utilities.

pub use crate::fixtures::{
    DriveSample, reference_definitions, reference_drive, reference_segments, scripted_drive,
};
pub use crate::must::{must, must_some, must_with};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
