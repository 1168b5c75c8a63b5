pub mod buckets;
pub mod dates;
pub mod document;
pub mod extract;
pub mod status;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::signupgenius::{RawSignup, API_DOCS};
use document::StatusDocument;

/// raw signups → dates → target date → extracted rows → buckets → document.
pub fn build_report(signups: &[RawSignup], today: NaiveDate) -> StatusDocument {
    let dates: BTreeSet<NaiveDate> = signups.iter().filter_map(extract::extract_date).collect();
    let target = dates::select_target_date(&dates, today);
    if target == today && !dates.contains(&today) {
        info!("No future dates with data found, using today's date: {}", target);
    } else {
        info!("Using target date: {}", target);
    }

    let mut extracted = Vec::with_capacity(signups.len());
    for raw in signups {
        debug!(
            item = raw.item.as_deref().unwrap_or(""),
            status = raw.status.as_deref().unwrap_or(""),
            "Processing slotitemid {}",
            raw.id()
        );
        match extract::extract(raw) {
            Ok(signup) if signup.date != target => {
                debug!("  - Signup date {} does not match target date, skipping", signup.date);
            }
            Ok(signup) => {
                if signup.is_filled {
                    debug!(
                        "  - {} volunteer(s) from {} {}",
                        signup.quantity,
                        raw.firstname.as_deref().unwrap_or(""),
                        raw.lastname.as_deref().unwrap_or("")
                    );
                }
                info!("  - Valid signup for {} at {}", signup.location, signup.time_slot);
                extracted.push(signup);
            }
            Err(reason) => {
                info!(
                    "  - {} for slotitemid {}, skipping. See {}",
                    reason,
                    raw.id(),
                    API_DOCS
                );
            }
        }
    }

    let agg = buckets::aggregate(&extracted, target);
    let names: Vec<&str> = agg.locations.iter().map(|l| l.name()).collect();
    info!(
        "Locations with data for {}: {}",
        target,
        if names.is_empty() { "None".to_string() } else { names.join(", ") }
    );
    if agg.buckets.is_empty() {
        info!("No time slots found for {}, using default schedule", target);
    }

    let doc = document::build(&agg, target);
    for slot in &doc.times {
        if slot.snackshacks.is_empty() {
            info!("  {} - No locations with data", slot.time);
        }
        for shack in &slot.snackshacks {
            info!(
                "  {} - {}: {} volunteers, Status: {:?}",
                slot.time, shack.name, shack.volunteers, shack.status
            );
        }
    }
    doc
}
