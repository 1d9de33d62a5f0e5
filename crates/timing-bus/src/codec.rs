//! Wire format.
//!
//! Every message is UTF-8 text `"<topic> <payload>"`, except raw checkpoint
//! signals which are a bare big-endian integer. Inbound position messages may
//! also arrive without a topic as a bare JSON array.

use laptime_track::Point;
use serde::Serialize;

use crate::error::{BusError, BusResult};

/// Split `"<topic> <payload>"`.
///
/// Text starting with `[` or `{` has no topic. Text without a space is all
/// payload.
pub fn split_topic(text: &str) -> (Option<&str>, &str) {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return (None, trimmed);
    }
    match text.split_once(' ') {
        Some((topic, payload)) => (Some(topic), payload),
        None => (None, text),
    }
}

/// Whether `message` is on `topic`: the topic followed by a space, or the
/// topic alone.
pub fn matches_topic(message: &[u8], topic: &str) -> bool {
    match message.strip_prefix(topic.as_bytes()) {
        Some(rest) => rest.is_empty() || rest.first() == Some(&b' '),
        None => false,
    }
}

/// Decode a `[x, y]` position sample.
pub fn decode_position(message: &[u8]) -> BusResult<Point> {
    let text = std::str::from_utf8(message)?;
    let (_, payload) = split_topic(text);
    let [x, y]: [f64; 2] = serde_json::from_str(payload.trim())?;
    Ok(Point::new(x, y))
}

/// Decode a driver change: everything after the first space.
pub fn decode_driver(message: &[u8]) -> BusResult<String> {
    let text = std::str::from_utf8(message)?;
    let name = text.split_once(' ').map_or(text, |(_, name)| name);
    Ok(name.to_string())
}

/// Decode a raw checkpoint signal: the whole message is one big-endian
/// unsigned integer.
pub fn decode_checkpoint_signal(message: &[u8]) -> BusResult<u32> {
    if message.is_empty() {
        return Err(BusError::decode("empty checkpoint signal"));
    }
    message.iter().try_fold(0u32, |acc, byte| {
        acc.checked_mul(256)
            .and_then(|acc| acc.checked_add(u32::from(*byte)))
            .ok_or_else(|| BusError::decode("checkpoint signal does not fit in 32 bits"))
    })
}

/// Decode a checkpoint signal written as decimal text, optionally after a topic.
pub fn decode_checkpoint_text(message: &[u8]) -> BusResult<u32> {
    let text = std::str::from_utf8(message)?;
    let (_, payload) = split_topic(text);
    payload
        .trim()
        .parse::<u32>()
        .map_err(|e| BusError::decode(format!("invalid checkpoint number {payload:?}: {e}")))
}

/// Encode `"<topic> <json>"`.
pub fn encode_message<T: Serialize + ?Sized>(topic: &str, payload: &T) -> BusResult<Vec<u8>> {
    let json = serde_json::to_string(payload)?;
    Ok(format!("{topic} {json}").into_bytes())
}

/// Encode a driver change the way the driver feed publishes it.
pub fn encode_driver(topic: &str, driver: &str) -> Vec<u8> {
    format!("{topic} {driver}").into_bytes()
}
