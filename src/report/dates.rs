use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::US::Pacific;
use tracing::{info, warn};

/// First date on or after `today`, else `today` itself.
pub fn select_target_date(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> NaiveDate {
    dates.range(today..).next().copied().unwrap_or(today)
}

/// The date we treat as "today": a valid `%Y-%m-%d` override, or the
/// US/Pacific calendar date at `now`.
pub fn resolve_today(override_date: Option<&str>, now: DateTime<Utc>) -> NaiveDate {
    if let Some(raw) = override_date {
        match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(date) => {
                info!("Using test date: {}", date);
                return date;
            }
            Err(_) => warn!("Invalid test date {:?}, using today's date instead", raw),
        }
    }
    now.with_timezone(&Pacific).date_naive()
}
