//! In-process transport over crossbeam channels.
//!
//! A [`ChannelSource`] can subscribe to a set of topics. Messages on other
//! topics are dropped on receipt, the way a pub/sub subscriber filters by
//! topic prefix. An empty subscription list accepts everything.

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

use crate::codec::matches_topic;
use crate::error::{BusError, BusResult};
use crate::transport::{MessageSink, MessageSource};

#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<Vec<u8>>,
}

impl ChannelSink {
    pub fn sender(&self) -> &Sender<Vec<u8>> {
        &self.tx
    }
}

impl MessageSink for ChannelSink {
    fn send(&mut self, message: &[u8]) -> BusResult<()> {
        self.tx
            .send(message.to_vec())
            .map_err(|_disconnected| BusError::Closed)
    }
}

#[derive(Debug)]
pub struct ChannelSource {
    rx: Receiver<Vec<u8>>,
    topics: Vec<String>,
    dropped: u64,
}

impl ChannelSource {
    /// Only accept messages on `topic` (in addition to any earlier subscriptions).
    pub fn subscribe(mut self, topic: impl Into<String>) -> Self {
        self.topics.push(topic.into());
        self
    }

    /// Messages discarded by the topic filter so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn accepts(&self, message: &[u8]) -> bool {
        self.topics.is_empty() || self.topics.iter().any(|t| matches_topic(message, t))
    }

    fn filter(&mut self, message: Vec<u8>) -> Option<Vec<u8>> {
        if self.accepts(&message) {
            Some(message)
        } else {
            self.dropped = self.dropped.saturating_add(1);
            tracing::trace!(len = message.len(), "message dropped by topic filter");
            None
        }
    }
}

impl MessageSource for ChannelSource {
    fn recv(&mut self) -> BusResult<Vec<u8>> {
        loop {
            let message = self.rx.recv().map_err(|_disconnected| BusError::Closed)?;
            if let Some(message) = self.filter(message) {
                return Ok(message);
            }
        }
    }

    fn try_recv(&mut self) -> BusResult<Option<Vec<u8>>> {
        loop {
            match self.rx.try_recv() {
                Ok(message) => {
                    if let Some(message) = self.filter(message) {
                        return Ok(Some(message));
                    }
                }
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => return Err(BusError::Closed),
            }
        }
    }
}

/// Unbounded in-process channel.
pub fn unbounded() -> (ChannelSink, ChannelSource) {
    let (tx, rx) = channel::unbounded();
    pair(tx, rx)
}

/// Bounded in-process channel; `send` blocks while full.
pub fn bounded(capacity: usize) -> (ChannelSink, ChannelSource) {
    let (tx, rx) = channel::bounded(capacity);
    pair(tx, rx)
}

fn pair(tx: Sender<Vec<u8>>, rx: Receiver<Vec<u8>>) -> (ChannelSink, ChannelSource) {
    (
        ChannelSink { tx },
        ChannelSource {
            rx,
            topics: Vec::new(),
            dropped: 0,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_round_trip_in_order() -> TestResult {
        let (mut sink, mut source) = unbounded();
        sink.send(b"a 1")?;
        sink.send(b"b 2")?;
        assert_eq!(source.recv()?, b"a 1");
        assert_eq!(source.recv()?, b"b 2");
        Ok(())
    }

    #[test]
    fn test_try_recv_empty_is_not_an_error() -> TestResult {
        let (_sink, mut source) = unbounded();
        assert_eq!(source.try_recv()?, None);
        Ok(())
    }

    #[test]
    fn test_closed_after_drain() -> TestResult {
        let (mut sink, mut source) = unbounded();
        sink.send(b"last")?;
        drop(sink);
        assert_eq!(source.recv()?, b"last");
        assert!(matches!(source.recv(), Err(BusError::Closed)));
        assert!(matches!(source.try_recv(), Err(BusError::Closed)));
        Ok(())
    }

    #[test]
    fn test_topic_filter_drops_other_topics() -> TestResult {
        let (mut sink, source) = unbounded();
        let mut source = source.subscribe("current_driver");
        sink.send(b"pixel_coordinates [1, 2]")?;
        sink.send(b"current_driver_extra x")?;
        sink.send(b"current_driver max")?;

        assert_eq!(source.try_recv()?, Some(b"current_driver max".to_vec()));
        assert_eq!(source.dropped(), 2);
        assert_eq!(source.try_recv()?, None);
        Ok(())
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (mut sink, source) = bounded(1);
        drop(source);
        assert!(matches!(sink.send(b"x"), Err(BusError::Closed)));
    }
}
