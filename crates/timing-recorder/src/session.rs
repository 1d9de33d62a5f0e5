//! Recording container and recorder.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use laptime_config::CrossingSource;
use laptime_track::{CheckpointDefinitions, Point};
use serde::{Deserialize, Serialize};

/// Recorded timing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecording {
    pub metadata: RecordingMetadata,
    pub entries: Vec<SessionEntry>,
}

/// Recording metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingMetadata {
    /// Wall-clock start, seconds since the Unix epoch.
    pub timestamp: u64,
    pub duration_seconds: f64,
    pub sample_count: usize,
    pub driver_changes: usize,
    pub crossing_source: CrossingSource,
    /// Track the session was timed on, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoints: Option<CheckpointDefinitions>,
    pub description: Option<String>,
}

/// One inbound input at an offset from the session start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub offset_seconds: f64,
    #[serde(flatten)]
    pub input: RecordedInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordedInput {
    Position { x: f64, y: f64 },
    CheckpointSignal { number: u32 },
    Driver { name: String },
}

impl RecordedInput {
    pub fn is_driver_change(&self) -> bool {
        matches!(self, Self::Driver { .. })
    }
}

impl From<Point> for RecordedInput {
    fn from(point: Point) -> Self {
        Self::Position {
            x: point.x,
            y: point.y,
        }
    }
}

/// Collects inputs in memory and writes them out on stop.
#[derive(Debug)]
pub struct SessionRecorder {
    output_path: PathBuf,
    entries: Vec<SessionEntry>,
    start_time: Option<(SystemTime, Instant)>,
    crossing_source: CrossingSource,
    checkpoints: Option<CheckpointDefinitions>,
}

impl SessionRecorder {
    pub fn new(output_path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        Ok(Self {
            output_path,
            entries: Vec::new(),
            start_time: None,
            crossing_source: CrossingSource::default(),
            checkpoints: None,
        })
    }

    /// Embed the track in the recording so it replays without the
    /// definitions file.
    pub fn with_checkpoints(mut self, checkpoints: CheckpointDefinitions) -> Self {
        self.checkpoints = Some(checkpoints);
        self
    }

    pub fn start_recording(&mut self, crossing_source: CrossingSource) {
        self.crossing_source = crossing_source;
        self.start_time = Some((SystemTime::now(), Instant::now()));
        self.entries.clear();
    }

    /// Record `input` at the time elapsed since [`Self::start_recording`].
    pub fn record(&mut self, input: RecordedInput) {
        if let Some((_, started)) = self.start_time {
            self.record_at(started.elapsed(), input);
        }
    }

    /// Record `input` at an explicit offset. Ignored while not recording.
    pub fn record_at(&mut self, offset: Duration, input: RecordedInput) {
        if self.start_time.is_none() {
            tracing::trace!("not recording, input ignored");
            return;
        }
        self.entries.push(SessionEntry {
            offset_seconds: offset.as_secs_f64(),
            input,
        });
    }

    pub fn record_position(&mut self, point: Point) {
        self.record(point.into());
    }

    pub fn record_signal(&mut self, number: u32) {
        self.record(RecordedInput::CheckpointSignal { number });
    }

    pub fn record_driver(&mut self, name: impl Into<String>) {
        self.record(RecordedInput::Driver { name: name.into() });
    }

    pub fn stop_recording(
        &mut self,
        description: Option<String>,
    ) -> anyhow::Result<SessionRecording> {
        let (start_wall, started) = self
            .start_time
            .take()
            .ok_or_else(|| anyhow::anyhow!("Recording not started"))?;

        let last_offset = self.entries.last().map_or(0.0, |e| e.offset_seconds);
        let driver_changes = self
            .entries
            .iter()
            .filter(|e| e.input.is_driver_change())
            .count();

        let metadata = RecordingMetadata {
            timestamp: start_wall.duration_since(UNIX_EPOCH)?.as_secs(),
            duration_seconds: started.elapsed().as_secs_f64().max(last_offset),
            sample_count: self.entries.len().saturating_sub(driver_changes),
            driver_changes,
            crossing_source: self.crossing_source,
            checkpoints: self.checkpoints.clone(),
            description,
        };

        let recording = SessionRecording {
            metadata,
            entries: std::mem::take(&mut self.entries),
        };

        self.save_recording(&recording)?;
        tracing::info!(
            path = %self.output_path.display(),
            entries = recording.entries.len(),
            "session recording saved"
        );
        Ok(recording)
    }

    fn save_recording(&self, recording: &SessionRecording) -> anyhow::Result<()> {
        let file = File::create(&self.output_path)
            .with_context(|| format!("creating {}", self.output_path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, recording)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load_recording<P: AsRef<Path>>(path: P) -> anyhow::Result<SessionRecording> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("parsing recording {}", path.display()))
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_recording(&self) -> bool {
        self.start_time.is_some()
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_inputs_before_start_are_ignored() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut recorder = SessionRecorder::new(dir.path().join("session.json"))?;
        recorder.record_position(Point::new(1.0, 2.0));
        assert_eq!(recorder.entry_count(), 0);
        assert!(!recorder.is_recording());
        Ok(())
    }

    #[test]
    fn test_stop_without_start_fails() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut recorder = SessionRecorder::new(dir.path().join("session.json"))?;
        let result = recorder.stop_recording(None);
        assert!(matches!(result, Err(e) if e.to_string().contains("not started")));
        Ok(())
    }

    #[test]
    fn test_new_creates_parent_directories() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested/deeper/session.json");
        let recorder = SessionRecorder::new(path.clone())?;
        assert!(path.parent().is_some_and(Path::is_dir));
        assert_eq!(recorder.output_path(), path);
        Ok(())
    }

    #[test]
    fn test_entry_wire_shape() -> TestResult {
        let entry = SessionEntry {
            offset_seconds: 1.5,
            input: RecordedInput::Driver {
                name: "max".to_string(),
            },
        };
        assert_eq!(
            serde_json::to_string(&entry)?,
            r#"{"offset_seconds":1.5,"kind":"driver","name":"max"}"#
        );
        let back: SessionEntry =
            serde_json::from_str(r#"{"offset_seconds":2.0,"kind":"position","x":5.5,"y":4.0}"#)?;
        assert_eq!(back.input, RecordedInput::Position { x: 5.5, y: 4.0 });
        Ok(())
    }

    #[test]
    fn test_metadata_counts() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut recorder = SessionRecorder::new(dir.path().join("session.json"))?;
        recorder.start_recording(CrossingSource::Positions);
        recorder.record_at(Duration::from_secs(1), Point::new(0.0, 0.0).into());
        recorder.record_at(
            Duration::from_secs(2),
            RecordedInput::Driver {
                name: "a".to_string(),
            },
        );
        recorder.record_at(Duration::from_secs(3), Point::new(1.0, 0.0).into());

        let recording = recorder.stop_recording(Some("counts".to_string()))?;
        assert_eq!(recording.metadata.sample_count, 2);
        assert_eq!(recording.metadata.driver_changes, 1);
        assert!(recording.metadata.duration_seconds >= 3.0);
        assert!(!recorder.is_recording());
        Ok(())
    }
}
