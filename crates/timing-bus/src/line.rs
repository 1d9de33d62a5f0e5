//! Newline-delimited transport.
//!
//! Outbound messages are written one per line. Inbound, a [`LineRouter`]
//! reads a single stream and fans each line out to the channel registered for
//! its topic, so one input (e.g. stdin) can carry positions and driver changes
//! together.

use std::io::{BufRead, Write};
use std::thread::{self, JoinHandle};

use crate::channel::ChannelSink;
use crate::codec::{matches_topic, split_topic};
use crate::error::{BusError, BusResult};
use crate::transport::MessageSink;

/// Writes each message followed by `\n` and flushes.
#[derive(Debug)]
pub struct LineSink<W: Write> {
    writer: W,
}

impl<W: Write> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MessageSink for LineSink<W> {
    fn send(&mut self, message: &[u8]) -> BusResult<()> {
        self.writer.write_all(message)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Counters returned when a router reaches end of input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterStats {
    pub lines: u64,
    pub routed: u64,
    pub unrouted: u64,
}

/// Splits one line stream into per-topic channels.
///
/// Routes are tried in registration order. A line matching none goes to the
/// untopiced sink if it carries no topic (a bare `[x, y]` array or a lone
/// number), then to the fallback, and is dropped when neither applies.
/// Dropping the router (at end of input) closes every channel.
#[derive(Debug, Default)]
pub struct LineRouter {
    routes: Vec<(String, ChannelSink)>,
    untopiced: Option<ChannelSink>,
    fallback: Option<ChannelSink>,
}

impl LineRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, topic: impl Into<String>, sink: ChannelSink) -> Self {
        self.routes.push((topic.into(), sink));
        self
    }

    /// Receives lines without a topic prefix.
    pub fn untopiced(mut self, sink: ChannelSink) -> Self {
        self.untopiced = Some(sink);
        self
    }

    /// Receives every line nothing else claimed.
    pub fn fallback(mut self, sink: ChannelSink) -> Self {
        self.fallback = Some(sink);
        self
    }

    /// Route lines until end of input.
    ///
    /// # Errors
    ///
    /// Fails only on a read error. Lines whose receiver has gone away are
    /// dropped.
    pub fn run<R: BufRead>(mut self, mut reader: R) -> BusResult<RouterStats> {
        let mut stats = RouterStats::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = trim_line_end(&buf);
            if line.is_empty() {
                continue;
            }
            stats.lines = stats.lines.saturating_add(1);

            let sink = match self.routes.iter_mut().find(|(topic, _)| matches_topic(line, topic)) {
                Some((_, sink)) => Some(sink),
                None if self.untopiced.is_some() && !has_topic(line) => {
                    self.untopiced.as_mut()
                }
                None => self.fallback.as_mut(),
            };

            match sink {
                Some(sink) => match sink.send(line) {
                    Ok(()) => stats.routed = stats.routed.saturating_add(1),
                    Err(BusError::Closed) => {
                        tracing::debug!("receiver gone, line dropped");
                    }
                    Err(e) => return Err(e),
                },
                None => {
                    stats.unrouted = stats.unrouted.saturating_add(1);
                    tracing::trace!(len = line.len(), "no route for line");
                }
            }
        }

        tracing::debug!(
            lines = stats.lines,
            routed = stats.routed,
            unrouted = stats.unrouted,
            "line input finished"
        );
        Ok(stats)
    }

    /// Run on a dedicated thread.
    ///
    /// # Errors
    ///
    /// Fails if the thread cannot be spawned.
    pub fn spawn<R>(self, reader: R) -> BusResult<JoinHandle<BusResult<RouterStats>>>
    where
        R: BufRead + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name("line-router".to_string())
            .spawn(move || self.run(reader))?;
        Ok(handle)
    }
}

/// Lines that are not UTF-8 cannot carry a topic.
fn has_topic(line: &[u8]) -> bool {
    std::str::from_utf8(line).is_ok_and(|text| split_topic(text).0.is_some())
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::unbounded;
    use crate::transport::MessageSource;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_line_sink_appends_newline() -> TestResult {
        let mut sink = LineSink::new(Vec::new());
        sink.send(b"lap_start {}")?;
        sink.send(b"lap_finished {}")?;
        assert_eq!(sink.into_inner(), b"lap_start {}\nlap_finished {}\n");
        Ok(())
    }

    #[test]
    fn test_router_splits_by_topic() -> TestResult {
        let (driver_sink, mut drivers) = unbounded();
        let (position_sink, mut positions) = unbounded();
        let input: &[u8] =
            b"pixel_coordinates [1, 2]\r\ncurrent_driver max\n\n[3, 4]\ncurrent_driver lewis";

        let stats = LineRouter::new()
            .route("current_driver", driver_sink)
            .fallback(position_sink)
            .run(input)?;

        assert_eq!(
            stats,
            RouterStats {
                lines: 4,
                routed: 4,
                unrouted: 0
            }
        );
        assert_eq!(positions.recv()?, b"pixel_coordinates [1, 2]");
        assert_eq!(positions.recv()?, b"[3, 4]");
        assert!(matches!(positions.recv(), Err(BusError::Closed)));
        assert_eq!(drivers.recv()?, b"current_driver max");
        assert_eq!(drivers.recv()?, b"current_driver lewis");
        Ok(())
    }

    #[test]
    fn test_unrouted_lines_are_counted() -> TestResult {
        let (driver_sink, _drivers) = unbounded();
        let input: &[u8] = b"noise\ncurrent_driver a\n";
        let stats = LineRouter::new().route("current_driver", driver_sink).run(input)?;
        assert_eq!(stats.unrouted, 1);
        assert_eq!(stats.routed, 1);
        Ok(())
    }

    #[test]
    fn test_foreign_topics_skip_the_untopiced_sink() -> TestResult {
        let (driver_sink, mut drivers) = unbounded();
        let (crossing_sink, mut crossings) = unbounded();
        let input: &[u8] = b"frame_meta {\"fps\": 30}\npixel_coordinates [1, 2]\n[3, 4]\n7\n\
            current_driver max\ndebug [9, 9]\n";

        let stats = LineRouter::new()
            .route("current_driver", driver_sink)
            .route("pixel_coordinates", crossing_sink.clone())
            .untopiced(crossing_sink)
            .run(input)?;

        assert_eq!(
            stats,
            RouterStats {
                lines: 6,
                routed: 4,
                unrouted: 2
            }
        );
        assert_eq!(crossings.recv()?, b"pixel_coordinates [1, 2]");
        assert_eq!(crossings.recv()?, b"[3, 4]");
        assert_eq!(crossings.recv()?, b"7");
        assert!(matches!(crossings.recv(), Err(BusError::Closed)));
        assert_eq!(drivers.recv()?, b"current_driver max");
        Ok(())
    }

    #[test]
    fn test_fallback_still_takes_topiced_leftovers() -> TestResult {
        let (bare_sink, mut bare) = unbounded();
        let (rest_sink, mut rest) = unbounded();
        let input: &[u8] = b"[1, 2]\nframe_meta {}\n";

        let stats = LineRouter::new()
            .untopiced(bare_sink)
            .fallback(rest_sink)
            .run(input)?;

        assert_eq!(stats.routed, 2);
        assert_eq!(bare.recv()?, b"[1, 2]");
        assert_eq!(rest.recv()?, b"frame_meta {}");
        Ok(())
    }

    #[test]
    fn test_spawned_router_closes_channels_at_eof() -> TestResult {
        let (sink, mut source) = unbounded();
        let handle = LineRouter::new()
            .fallback(sink)
            .spawn(std::io::Cursor::new(b"[0, 0]\n".to_vec()))?;

        assert_eq!(source.recv()?, b"[0, 0]");
        assert!(matches!(source.recv(), Err(BusError::Closed)));
        let stats = handle.join().map_err(|_panic| "router thread panicked")??;
        assert_eq!(stats.lines, 1);
        Ok(())
    }
}
