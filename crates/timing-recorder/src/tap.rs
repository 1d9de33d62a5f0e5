//! Record inbound messages as they pass into the pipeline.

use std::sync::{Arc, Mutex, PoisonError};

use laptime_bus::{
    BusResult, MessageSource, SignalFormat, decode_checkpoint_signal, decode_checkpoint_text,
    decode_driver, decode_position,
};

use crate::session::{RecordedInput, SessionRecorder};

/// Recorder shared by the crossing tap and the driver tap.
pub type SharedRecorder = Arc<Mutex<SessionRecorder>>;

/// How a tapped source's messages are decoded for recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapKind {
    Positions,
    CheckpointSignals(SignalFormat),
    Drivers,
}

/// A [`MessageSource`] that records every decodable message it hands out.
///
/// Messages are passed through unchanged. Ones that fail to decode are not
/// recorded; the pipeline reports them.
#[derive(Debug)]
pub struct RecordingTap<S: MessageSource> {
    inner: S,
    kind: TapKind,
    recorder: SharedRecorder,
}

impl<S: MessageSource> RecordingTap<S> {
    pub fn new(inner: S, kind: TapKind, recorder: SharedRecorder) -> Self {
        Self {
            inner,
            kind,
            recorder,
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn note(&self, message: &[u8]) {
        let input = match self.kind {
            TapKind::Positions => decode_position(message).map(RecordedInput::from),
            TapKind::CheckpointSignals(SignalFormat::BigEndian) => {
                decode_checkpoint_signal(message)
                    .map(|number| RecordedInput::CheckpointSignal { number })
            }
            TapKind::CheckpointSignals(SignalFormat::Decimal) => decode_checkpoint_text(message)
                .map(|number| RecordedInput::CheckpointSignal { number }),
            TapKind::Drivers => decode_driver(message).map(|name| RecordedInput::Driver { name }),
        };

        match input {
            Ok(input) => self
                .recorder
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .record(input),
            Err(e) => tracing::trace!(error = %e, "message not recorded"),
        }
    }
}

impl<S: MessageSource> MessageSource for RecordingTap<S> {
    fn recv(&mut self) -> BusResult<Vec<u8>> {
        let message = self.inner.recv()?;
        self.note(&message);
        Ok(message)
    }

    fn try_recv(&mut self) -> BusResult<Option<Vec<u8>>> {
        let message = self.inner.try_recv()?;
        if let Some(message) = &message {
            self.note(message);
        }
        Ok(message)
    }
}
