//! Persisted checkpoint definitions.
//!
//! ```json
//! { "checkpoints": [ { "x1": 5, "y1": 5, "x2": 6, "y2": 5 }, ... ] }
//! ```
//!
//! Array order is semantic: element 0 is the finish line and the following
//! elements are sectors 1..N in traversal order.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TrackError, TrackResult};
use crate::geometry::{Point, Segment};

/// One hand-drawn checkpoint line, in integer pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointDefinition {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl CheckpointDefinition {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn segment(&self) -> Segment {
        Segment::new(
            Point::new(f64::from(self.x1), f64::from(self.y1)),
            Point::new(f64::from(self.x2), f64::from(self.y2)),
        )
    }
}

/// The persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointDefinitions {
    pub checkpoints: Vec<CheckpointDefinition>,
}

impl CheckpointDefinitions {
    pub fn new(checkpoints: Vec<CheckpointDefinition>) -> Self {
        Self { checkpoints }
    }

    pub fn from_json_str(json: &str) -> TrackResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> TrackResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TrackError::io(path, e))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Write the document as 4-space indented JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> TrackResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| TrackError::io(parent, e))?;
        }

        let file = File::create(path).map_err(|e| TrackError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        self.serialize(&mut serializer)?;
        writer.flush().map_err(|e| TrackError::io(path, e))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

/// External collaborator that produces checkpoint definitions when none are
/// persisted yet, e.g. by letting an operator draw them on a frame.
pub trait CheckpointDefiner {
    fn define(&mut self) -> TrackResult<CheckpointDefinitions>;
}

/// Load definitions from `path`, or ask `definer` for them and persist the
/// result when the file does not exist.
pub fn load_or_define(
    path: impl AsRef<Path>,
    definer: &mut dyn CheckpointDefiner,
) -> TrackResult<CheckpointDefinitions> {
    let path = path.as_ref();
    if path.is_file() {
        tracing::debug!(path = %path.display(), "loading checkpoint definitions");
        return CheckpointDefinitions::load(path);
    }

    tracing::info!(
        path = %path.display(),
        "no checkpoint definitions found, invoking definer"
    );
    let definitions = definer.define()?;
    definitions.save(path)?;
    Ok(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDefiner {
        calls: usize,
    }

    impl CheckpointDefiner for FixedDefiner {
        fn define(&mut self) -> TrackResult<CheckpointDefinitions> {
            self.calls += 1;
            Ok(CheckpointDefinitions::new(vec![
                CheckpointDefinition::new(5, 5, 6, 5),
                CheckpointDefinition::new(3, 1, 3, 2),
            ]))
        }
    }

    #[test]
    fn test_parse_document() -> TrackResult<()> {
        let defs = CheckpointDefinitions::from_json_str(
            r#"{"checkpoints": [{"x1": 5, "y1": 5, "x2": 6, "y2": 5}]}"#,
        )?;
        assert_eq!(defs.len(), 1);
        assert_eq!(
            defs.checkpoints.first(),
            Some(&CheckpointDefinition::new(5, 5, 6, 5))
        );
        Ok(())
    }

    #[test]
    fn test_malformed_document_is_json_error() {
        let result = CheckpointDefinitions::from_json_str(r#"{"checkpoints": [{"x1": 5}]}"#);
        assert!(matches!(result, Err(TrackError::Json(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = CheckpointDefinitions::load("/nonexistent/definitely/missing.json");
        assert!(matches!(result, Err(TrackError::Io { .. })));
    }

    #[test]
    fn test_load_or_define_persists_definer_output() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("time_tracking.json");
        let mut definer = FixedDefiner { calls: 0 };

        let first = load_or_define(&path, &mut definer)?;
        assert_eq!(definer.calls, 1);
        assert!(path.is_file());

        let second = load_or_define(&path, &mut definer)?;
        assert_eq!(definer.calls, 1, "existing file must not invoke the definer");
        assert_eq!(first, second);

        let raw = std::fs::read_to_string(&path)?;
        assert!(raw.contains("\n        {"), "expected 4-space indentation: {raw}");
        Ok(())
    }
}
