use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Closed,
    #[serde(rename = "Fully Open")]
    FullyOpen,
    #[serde(rename = "Grill open")]
    GrillOpen,
    Limited,
}

/// Status of one shack for one time slot.
///
/// Zero volunteers is always `Closed`, even when nothing was requested.
/// `filled > capacity` (including capacity 0) counts as fully open. The grill
/// threshold is 75% of capacity, compared exactly as `4 * filled >= 3 * capacity`.
pub fn classify(filled: u32, capacity: u32) -> Status {
    let (f, c) = (u64::from(filled), u64::from(capacity));
    if f == 0 {
        Status::Closed
    } else if f >= c {
        Status::FullyOpen
    } else if 4 * f >= 3 * c {
        Status::GrillOpen
    } else {
        Status::Limited
    }
}
