use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::extract::{ExtractedSignup, Location};

/// Ordered by time slot text first, then location declaration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    pub time_slot: String,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bucket {
    pub filled: u32,
    pub capacity: u32,
}

#[derive(Debug, Default)]
pub struct Aggregation {
    pub buckets: BTreeMap<BucketKey, Bucket>,
    /// Shacks with at least one signup on the target date.
    pub locations: BTreeSet<Location>,
}

impl Aggregation {
    /// Distinct time slots, lexicographically sorted.
    pub fn time_slots(&self) -> BTreeSet<&str> {
        self.buckets.keys().map(|k| k.time_slot.as_str()).collect()
    }

    pub fn get(&self, time_slot: &str, location: Location) -> Option<&Bucket> {
        self.buckets.get(&BucketKey {
            time_slot: time_slot.to_string(),
            location,
        })
    }
}

pub fn aggregate(signups: &[ExtractedSignup], target: NaiveDate) -> Aggregation {
    let mut agg = Aggregation::default();

    for s in signups.iter().filter(|s| s.date == target) {
        let bucket = agg
            .buckets
            .entry(BucketKey {
                time_slot: s.time_slot.clone(),
                location: s.location,
            })
            .or_default();
        bucket.capacity = bucket.capacity.saturating_add(s.quantity);
        if s.is_filled {
            bucket.filled = bucket.filled.saturating_add(s.quantity);
        }
        agg.locations.insert(s.location);
    }

    agg
}
