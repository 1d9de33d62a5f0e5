//! Historical best-time lookup.

use laptime_config::DEFAULT_PERSONAL_BEST_SENTINEL;

use crate::best_times::{BestTimes, Slot};
use crate::error::TimingResult;

/// Source of all-time best times, queried once at startup.
pub trait BestTimeArchive {
    /// Return the all-time record for a track with `sector_count` sectors.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TimingError::Archive`] when the store cannot be reached.
    fn request_best_times(&self, sector_count: u32) -> TimingResult<BestTimes>;
}

/// Fixed in-memory record standing in for the persistent store.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticBestTimeArchive {
    record: BestTimes,
    padding: f64,
}

impl StaticBestTimeArchive {
    pub fn new(record: BestTimes, padding: f64) -> Self {
        Self { record, padding }
    }

    pub fn record(&self) -> &BestTimes {
        &self.record
    }
}

impl Default for StaticBestTimeArchive {
    /// The historical three-sector record.
    fn default() -> Self {
        let record = BestTimes::from_iter([
            (Slot::Sector(1), 9.87),
            (Slot::Sector(2), 4.08),
            (Slot::Sector(3), 5.53),
            (Slot::Lap, 19.48),
        ]);
        Self::new(record, DEFAULT_PERSONAL_BEST_SENTINEL)
    }
}

impl BestTimeArchive for StaticBestTimeArchive {
    fn request_best_times(&self, sector_count: u32) -> TimingResult<BestTimes> {
        let mut times = BestTimes::uniform(sector_count, self.padding);
        for (slot, time) in self.record.iter() {
            let in_range = match slot {
                Slot::Sector(n) => n <= sector_count,
                Slot::Lap => true,
            };
            if in_range {
                times.set(slot, time);
            }
        }
        tracing::debug!(sector_count, slots = times.len(), "best times loaded from static archive");
        Ok(times)
    }
}
