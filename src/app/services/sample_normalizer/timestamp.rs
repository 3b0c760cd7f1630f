//! Sample timestamp parsing
//!
//! Sampling times are recorded as separate DATE and TIME cells on a fixed
//! local clock with no daylight saving. They are combined and parsed into a
//! zone-aware timestamp with a fixed offset.

use crate::constants::TIMESTAMP_FORMATS;
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

/// Build the fixed offset for a whole-hour UTC offset
pub fn fixed_offset(utc_offset_hours: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(utc_offset_hours * 3600).ok_or_else(|| {
        Error::configuration(format!("Invalid UTC offset: {} hours", utc_offset_hours))
    })
}

/// Combine DATE and TIME cells into one `"date time"` string
///
/// Returns `None` when either cell is missing.
pub fn combine_date_time(date: Option<&str>, time: Option<&str>) -> Option<String> {
    match (date, time) {
        (Some(date), Some(time)) => Some(format!("{} {}", date.trim(), time.trim())),
        _ => None,
    }
}

/// Parse a combined `"month/day/year hour:minute"` string in `offset`
pub fn parse_timestamp(raw: &str, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .and_then(|naive| offset.from_local_datetime(&naive).single())
}
