//! Timing event publisher.

use laptime_config::TopicSettings;
use laptime_core::TimingEvent;

use crate::codec::encode_message;
use crate::error::BusResult;
use crate::transport::MessageSink;

/// Topic an event is published on.
pub fn topic_for<'a>(topics: &'a TopicSettings, event: &TimingEvent) -> &'a str {
    match event {
        TimingEvent::Sector(_) => &topics.sector_finished,
        TimingEvent::Lap(_) => &topics.lap_finished,
        TimingEvent::LapStart(_) => &topics.lap_start,
    }
}

/// Encode an event as `"<topic> <json>"`.
pub fn encode_event(topics: &TopicSettings, event: &TimingEvent) -> BusResult<Vec<u8>> {
    let topic = topic_for(topics, event);
    match event {
        TimingEvent::Sector(e) => encode_message(topic, e),
        TimingEvent::Lap(e) => encode_message(topic, e),
        TimingEvent::LapStart(e) => encode_message(topic, e),
    }
}

pub struct TimingPublisher<S: MessageSink> {
    sink: S,
    topics: TopicSettings,
    published: u64,
}

impl<S: MessageSink> TimingPublisher<S> {
    pub fn new(sink: S, topics: TopicSettings) -> Self {
        Self {
            sink,
            topics,
            published: 0,
        }
    }

    pub fn publish(&mut self, event: &TimingEvent) -> BusResult<()> {
        let message = encode_event(&self.topics, event)?;
        self.sink.send(&message)?;
        self.published = self.published.saturating_add(1);
        tracing::trace!(topic = topic_for(&self.topics, event), "event published");
        Ok(())
    }

    pub fn publish_all(&mut self, events: &[TimingEvent]) -> BusResult<()> {
        events.iter().try_for_each(|event| self.publish(event))
    }

    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn topics(&self) -> &TopicSettings {
        &self.topics
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
