//! Message plumbing for the lap timer.
//!
//! ## Modules
//! - `codec` - Topic-prefixed text messages, positions, driver changes, checkpoint signals
//! - `transport` - `MessageSource` / `MessageSink` seams
//! - `channel` - In-process crossbeam transport with topic filtering
//! - `line` - Newline-delimited output and the input line router
//! - `publisher` - `TimingEvent` to topic and JSON body
//! - `pipeline` - The blocking tick loop tying it together

#![deny(static_mut_refs)]

pub mod channel;
pub mod codec;
pub mod error;
pub mod line;
pub mod pipeline;
pub mod publisher;
pub mod transport;

pub use channel::{ChannelSink, ChannelSource};
pub use codec::{
    decode_checkpoint_signal, decode_checkpoint_text, decode_driver, decode_position,
    encode_driver, encode_message, matches_topic, split_topic,
};
pub use error::{BusError, BusResult};
pub use line::{LineRouter, LineSink, RouterStats};
pub use pipeline::{MalformedPolicy, PipelineStats, SignalFormat, TimingPipeline};
pub use publisher::{TimingPublisher, encode_event, topic_for};
pub use transport::{MessageSink, MessageSource};
