use chrono::NaiveDate;
use serde::Serialize;

use super::buckets::{Aggregation, Bucket};
use super::status::{classify, Status};

pub const SIGNUP_URL: &str = "https://www.signupgenius.com/go/5080C44AEAB2EAAFF2-54832801-evll#/";

/// Shown when the target date has no parseable time slots at all.
pub const DEFAULT_TIME_SLOTS: [&str; 4] = [
    "9:00am-11:15am",
    "11:15am-1:30pm",
    "1:30pm-3:45pm",
    "4:30pm-6:30pm",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusDocument {
    pub date: String,
    pub times: Vec<TimeSlotEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlotEntry {
    pub time: String,
    pub snackshacks: Vec<SnackShackEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnackShackEntry {
    pub name: String,
    pub status: Status,
    pub volunteers: String,
    pub signup_url: String,
}

impl SnackShackEntry {
    fn new(name: &str, bucket: Bucket) -> Self {
        Self {
            name: name.to_string(),
            status: classify(bucket.filled, bucket.capacity),
            volunteers: format!("{}/{}", bucket.filled, bucket.capacity),
            signup_url: SIGNUP_URL.to_string(),
        }
    }
}

pub fn build(agg: &Aggregation, target: NaiveDate) -> StatusDocument {
    let slots: Vec<&str> = agg.time_slots().into_iter().collect();

    let times = if slots.is_empty() {
        // Every bucket is zero here, so each listed shack comes out Closed 0/0.
        DEFAULT_TIME_SLOTS
            .iter()
            .map(|slot| entry_for(agg, slot))
            .collect()
    } else {
        slots.iter().map(|slot| entry_for(agg, slot)).collect()
    };

    StatusDocument {
        date: target.format("%Y-%m-%d").to_string(),
        times,
    }
}

fn entry_for(agg: &Aggregation, slot: &str) -> TimeSlotEntry {
    let snackshacks = agg
        .locations
        .iter()
        .map(|&loc| {
            let bucket = agg.get(slot, loc).copied().unwrap_or_default();
            SnackShackEntry::new(loc.name(), bucket)
        })
        .collect();

    TimeSlotEntry {
        time: slot.to_string(),
        snackshacks,
    }
}
