use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate};
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::signupgenius::RawSignup;

static TIME_SLOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+:\d+\s*(?:am|pm)?)\s*-\s*(\d+:\d+\s*(?:am|pm)?|close)").unwrap()
});

/// Snack shacks we report on. Declaration order is both the match priority
/// and the order shacks appear in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Location {
    Madison,
    Garfield,
    MinorsClassic,
}

impl Location {
    pub const ALL: [Location; 3] = [Location::Madison, Location::Garfield, Location::MinorsClassic];

    pub fn name(self) -> &'static str {
        match self {
            Location::Madison => "Madison",
            Location::Garfield => "Garfield",
            Location::MinorsClassic => "Minor's Classic",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSignup {
    pub date: NaiveDate,
    pub location: Location,
    pub time_slot: String,
    pub quantity: u32,
    pub is_filled: bool,
}

/// Why a signup row was left out of the report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("could not determine date")]
    MissingDate,
    #[error("could not determine location")]
    UnknownLocation,
    #[error("could not determine time slot")]
    MissingTimeSlot,
}

pub fn extract(raw: &RawSignup) -> Result<ExtractedSignup, SkipReason> {
    let date = extract_date(raw).ok_or(SkipReason::MissingDate)?;
    let item = raw.item.as_deref().unwrap_or("");
    let location = extract_location(item).ok_or(SkipReason::UnknownLocation)?;
    let time_slot = extract_time_slot(item).ok_or(SkipReason::MissingTimeSlot)?;

    Ok(ExtractedSignup {
        date,
        location,
        time_slot,
        quantity: parse_quantity(raw.myqty.as_ref()),
        is_filled: raw
            .firstname
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty()),
    })
}

/// Calendar date of a signup. `startdatestring` ("2025-04-02 07:00 GMT")
/// wins whenever it is non-blank; the epoch `startdate` is only a fallback.
pub fn extract_date(raw: &RawSignup) -> Option<NaiveDate> {
    if let Some(s) = raw.startdatestring.as_deref().filter(|s| !s.trim().is_empty()) {
        let token = s.split_whitespace().next()?;
        return NaiveDate::parse_from_str(token, "%Y-%m-%d").ok();
    }

    let secs = json_int(raw.startdate.as_ref()?)?;
    DateTime::from_timestamp(secs, 0).map(|utc| utc.with_timezone(&Local).date_naive())
}

pub fn extract_location(item: &str) -> Option<Location> {
    Location::ALL
        .into_iter()
        .find(|loc| item.contains(loc.name()))
}

pub fn extract_time_slot(item: &str) -> Option<String> {
    TIME_SLOT_RE
        .find(item)
        .map(|m| m.as_str().trim().to_string())
}

fn parse_quantity(value: Option<&Value>) -> u32 {
    value
        .and_then(json_int)
        .and_then(|q| u32::try_from(q).ok())
        .unwrap_or(0)
}

/// Integer from a JSON number or integer string. Floats are truncated.
fn json_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signup(item: &str, date: &str) -> RawSignup {
        RawSignup {
            item: Some(item.to_string()),
            startdatestring: Some(date.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn full_record() {
        let raw = RawSignup {
            myqty: Some(json!(2)),
            firstname: Some("Pat".into()),
            ..signup("Madison Snack Shack 9:00am - 11:15am", "2025-04-05 07:00 GMT")
        };
        let e = extract(&raw).unwrap();
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2025, 4, 5).unwrap());
        assert_eq!(e.location, Location::Madison);
        assert_eq!(e.time_slot, "9:00am - 11:15am");
        assert_eq!(e.quantity, 2);
        assert!(e.is_filled);
    }

    #[test]
    fn unknown_location_dropped() {
        let raw = signup("Concession Stand 9:00am - 11:15am", "2025-04-05 07:00 GMT");
        assert_eq!(extract(&raw), Err(SkipReason::UnknownLocation));
    }

    #[test]
    fn missing_time_slot_dropped() {
        let raw = signup("Garfield all day", "2025-04-05 07:00 GMT");
        assert_eq!(extract(&raw), Err(SkipReason::MissingTimeSlot));
    }

    #[test]
    fn missing_date_dropped() {
        let raw = RawSignup {
            item: Some("Garfield 9:00am-11:15am".into()),
            ..Default::default()
        };
        assert_eq!(extract(&raw), Err(SkipReason::MissingDate));
    }

    #[test]
    fn location_priority_order() {
        assert_eq!(
            extract_location("Garfield (overflow from Madison)"),
            Some(Location::Madison)
        );
        assert_eq!(extract_location("Minor's Classic 4:30pm-6:30pm"), Some(Location::MinorsClassic));
        assert_eq!(extract_location("madison"), None);
    }

    #[test]
    fn time_slot_variants() {
        assert_eq!(extract_time_slot("Madison 9:00am-11:15am").as_deref(), Some("9:00am-11:15am"));
        assert_eq!(extract_time_slot("Garfield 4:30 PM - close").as_deref(), Some("4:30 PM - close"));
        assert_eq!(extract_time_slot("Madison 1:30-3:45pm").as_deref(), Some("1:30-3:45pm"));
        assert_eq!(extract_time_slot("Garfield 4:30pm - CLOSE").as_deref(), Some("4:30pm - CLOSE"));
        assert_eq!(extract_time_slot("Madison morning"), None);
    }

    #[test]
    fn date_string_wins_over_timestamp() {
        let raw = RawSignup {
            startdatestring: Some("not-a-date 07:00".into()),
            startdate: Some(json!(1743602400)),
            ..Default::default()
        };
        assert_eq!(extract_date(&raw), None);
    }

    #[test]
    fn timestamp_fallback() {
        // 2025-04-02 19:00 UTC is 2025-04-02 or 2025-04-03 in any local zone.
        let candidates = [
            NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 3).unwrap(),
        ];
        for value in [json!(1743620400), json!("1743620400"), json!(1743620400.0)] {
            let raw = RawSignup {
                startdate: Some(value),
                ..Default::default()
            };
            let date = extract_date(&raw).unwrap();
            assert!(candidates.contains(&date), "{date}");
        }
    }

    #[test]
    fn float_timestamp_keeps_record() {
        let raw = RawSignup {
            item: Some("Madison 9:00am-11:15am".into()),
            startdate: Some(json!(1743620400.0)),
            myqty: Some(json!(2.0)),
            ..Default::default()
        };
        let e = extract(&raw).unwrap();
        assert_eq!(e.quantity, 2);
        assert_eq!(e.location, Location::Madison);
    }

    #[test]
    fn blank_date_string_falls_back_to_timestamp() {
        let with_ts = |s: &str| RawSignup {
            startdatestring: Some(s.into()),
            startdate: Some(json!(1743620400)),
            ..Default::default()
        };
        let expected = extract_date(&RawSignup {
            startdate: Some(json!(1743620400)),
            ..Default::default()
        });
        assert!(expected.is_some());
        assert_eq!(extract_date(&with_ts("")), expected);
        assert_eq!(extract_date(&with_ts("   ")), expected);
        // Leading whitespace before the date token is tolerated.
        assert_eq!(
            extract_date(&with_ts(" 2025-04-05 07:00 GMT")),
            NaiveDate::from_ymd_opt(2025, 4, 5)
        );
    }

    #[test]
    fn unparseable_timestamp() {
        let raw = RawSignup {
            startdate: Some(json!("soon")),
            ..Default::default()
        };
        assert_eq!(extract_date(&raw), None);
    }

    #[test]
    fn quantity_degrades_to_zero() {
        assert_eq!(parse_quantity(Some(&json!(3))), 3);
        assert_eq!(parse_quantity(Some(&json!(" 4 "))), 4);
        assert_eq!(parse_quantity(Some(&json!("lots"))), 0);
        assert_eq!(parse_quantity(Some(&json!(-2))), 0);
        assert_eq!(parse_quantity(Some(&json!(2.0))), 2);
        assert_eq!(parse_quantity(Some(&json!(2.7))), 2);
        assert_eq!(parse_quantity(Some(&json!(-1.5))), 0);
        assert_eq!(parse_quantity(Some(&json!(null))), 0);
        assert_eq!(parse_quantity(None), 0);

        let raw = RawSignup {
            myqty: Some(json!("lots")),
            ..signup("Madison 9:00am-11:15am", "2025-04-05")
        };
        assert_eq!(extract(&raw).unwrap().quantity, 0);
    }

    #[test]
    fn blank_first_name_is_open() {
        let raw = RawSignup {
            firstname: Some("   ".into()),
            lastname: Some("Smith".into()),
            ..signup("Madison 9:00am-11:15am", "2025-04-05")
        };
        assert!(!extract(&raw).unwrap().is_filled);
    }
}
