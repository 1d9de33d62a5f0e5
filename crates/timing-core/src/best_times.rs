//! Best-time tables and the purple/green/yellow classifier.

use std::collections::BTreeMap;
use std::fmt;

use laptime_config::DEFAULT_PERSONAL_BEST_SENTINEL;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const BEST_TIME_SUFFIX: &str = "_best_time";

/// A timed slot: one sector or the whole lap.
///
/// Ordering puts every sector (ascending) before the lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    Sector(u32),
    Lap,
}

impl Slot {
    /// Table key: `sector_<n>` or `lap`.
    pub fn key(&self) -> String {
        match self {
            Slot::Sector(n) => format!("sector_{n}"),
            Slot::Lap => "lap".to_string(),
        }
    }

    /// Key used in the lap-start snapshot: `sector_<n>_best_time` or `lap_best_time`.
    pub fn wire_key(&self) -> String {
        format!("{}{BEST_TIME_SUFFIX}", self.key())
    }

    /// Parse either a table key or a wire key.
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.strip_suffix(BEST_TIME_SUFFIX).unwrap_or(key);
        if key == "lap" {
            return Some(Slot::Lap);
        }
        key.strip_prefix("sector_")
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .map(Slot::Sector)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Classification of a time against the best-time tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Faster than the all-time best.
    Purple,
    /// Faster than the current driver's personal best.
    Green,
    Yellow,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Purple => "purple",
            Tier::Green => "green",
            Tier::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best time per slot.
///
/// Serializes as the flat lap-start object, e.g.
/// `{"sector_1_best_time": 9.87, ..., "lap_best_time": 19.48}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BestTimes {
    times: BTreeMap<Slot, f64>,
}

impl BestTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sectors `1..=sector_count` plus the lap, all set to `value`.
    pub fn uniform(sector_count: u32, value: f64) -> Self {
        let times = (1..=sector_count)
            .map(Slot::Sector)
            .chain(std::iter::once(Slot::Lap))
            .map(|slot| (slot, value))
            .collect();
        Self { times }
    }

    pub fn get(&self, slot: Slot) -> Option<f64> {
        self.times.get(&slot).copied()
    }

    pub fn set(&mut self, slot: Slot, time: f64) {
        self.times.insert(slot, time);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, f64)> + '_ {
        self.times.iter().map(|(slot, time)| (*slot, *time))
    }
}

impl FromIterator<(Slot, f64)> for BestTimes {
    fn from_iter<I: IntoIterator<Item = (Slot, f64)>>(iter: I) -> Self {
        Self {
            times: iter.into_iter().collect(),
        }
    }
}

impl Serialize for BestTimes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.times.len()))?;
        for (slot, time) in &self.times {
            map.serialize_entry(&slot.wire_key(), time)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BestTimes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, time)| {
                Slot::parse(&key)
                    .map(|slot| (slot, time))
                    .ok_or_else(|| D::Error::custom(format!("unknown best-time key '{key}'")))
            })
            .collect()
    }
}

/// Classify `time` for `slot` and update the tables when `valid`.
///
/// - Faster than the all-time best: `Purple`. A valid time replaces the
///   all-time best, and the personal best too when it is also faster.
/// - Otherwise faster than the personal best: `Green`. A valid time replaces
///   the personal best.
/// - Otherwise `Yellow`, nothing changes.
///
/// A slot missing from either table compares against the default personal
/// best sentinel.
pub fn classify(
    all_time: &mut BestTimes,
    personal: &mut BestTimes,
    time: f64,
    slot: Slot,
    valid: bool,
) -> Tier {
    classify_with_fallback(
        all_time,
        personal,
        time,
        slot,
        valid,
        DEFAULT_PERSONAL_BEST_SENTINEL,
    )
}

fn classify_with_fallback(
    all_time: &mut BestTimes,
    personal: &mut BestTimes,
    time: f64,
    slot: Slot,
    valid: bool,
    missing: f64,
) -> Tier {
    let all_time_best = all_time.get(slot).unwrap_or(missing);
    let personal_best = personal.get(slot).unwrap_or(missing);

    if time < all_time_best {
        if valid {
            all_time.set(slot, time);
            if time < personal_best {
                personal.set(slot, time);
            }
        }
        Tier::Purple
    } else if time < personal_best {
        if valid {
            personal.set(slot, time);
        }
        Tier::Green
    } else {
        Tier::Yellow
    }
}

/// All-time and personal best tables owned by the lap timer.
#[derive(Debug, Clone, PartialEq)]
pub struct BestTimeBoard {
    all_time: BestTimes,
    personal: BestTimes,
    sector_count: u32,
    sentinel: f64,
}

impl BestTimeBoard {
    /// Personal bests start at `sentinel` for every slot.
    pub fn new(all_time: BestTimes, sector_count: u32, sentinel: f64) -> Self {
        Self {
            all_time,
            personal: BestTimes::uniform(sector_count, sentinel),
            sector_count,
            sentinel,
        }
    }

    pub fn all_time(&self) -> &BestTimes {
        &self.all_time
    }

    pub fn personal(&self) -> &BestTimes {
        &self.personal
    }

    pub fn sentinel(&self) -> f64 {
        self.sentinel
    }

    pub fn classify(&mut self, time: f64, slot: Slot, valid: bool) -> Tier {
        classify_with_fallback(
            &mut self.all_time,
            &mut self.personal,
            time,
            slot,
            valid,
            self.sentinel,
        )
    }

    /// Driver change: every personal best back to the sentinel.
    pub fn reset_personal(&mut self) {
        self.personal = BestTimes::uniform(self.sector_count, self.sentinel);
    }
}
