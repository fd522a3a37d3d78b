//! Lenient field extraction for shift rows coming off the wire or out of
//! predecessor caches. Spreadsheet round-trips and the old systems produce
//! numeric ids, `YYYY/M/D` dates and full datetime strings where this crate
//! writes canonical forms, so every inbound row passes through here.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;

/// Extract a field as a string under any of the given keys, coercing
/// numbers (spreadsheet ids come back numeric).
pub(crate) fn string_field(row: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match row.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// Parse a date in any of the shapes seen in the wild: `YYYY-MM-DD`,
/// `YYYY/M/D`, or a full datetime whose date part is taken as-is.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    cafe_catalog::timefmt::parse_loose_date(raw)
}

pub(crate) fn parse_time(raw: &str) -> Option<NaiveTime> {
    cafe_catalog::timefmt::parse_hhmm(raw)
}

/// Parse a timestamp, falling back to `now` for rows that never carried
/// one. Ordering among such rows is arbitrary and nothing depends on it.
pub(crate) fn parse_timestamp(row: &Value, keys: &[&str]) -> DateTime<Utc> {
    string_field(row, keys)
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}
