//! Lenient field extraction for punch rows coming off the wire or out of
//! predecessor caches, mirroring the scheduling module's treatment of
//! spreadsheet round-trip quirks.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;

use cafe_catalog::timefmt;

/// Extract a field as a string under any of the given keys, coercing
/// numbers.
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

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    timefmt::parse_loose_date(raw)
}

pub(crate) fn parse_time(raw: &str) -> Option<NaiveTime> {
    timefmt::parse_hhmm(raw)
}

/// Parse a timestamp, falling back to `now` for rows that never carried
/// one.
pub(crate) fn parse_timestamp(row: &Value, keys: &[&str]) -> DateTime<Utc> {
    string_field(row, keys)
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}
