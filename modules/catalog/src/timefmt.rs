//! Serde helpers for `HH:MM` clock times.
//!
//! The spreadsheet service and the original front end exchange slot
//! boundaries and punch times as `"10:00"` strings; chrono's default
//! `NaiveTime` format insists on seconds. These helpers accept both.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serializer};

/// Parse `HH:MM` (or `HH:MM:SS`) into a [`NaiveTime`].
#[must_use]
pub fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Format a [`NaiveTime`] as `HH:MM`.
#[must_use]
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parse a date in any shape the spreadsheet round-trip produces:
/// `YYYY-MM-DD`, `YYYY/M/D`, or a full datetime whose date part is taken
/// as-is.
#[must_use]
pub fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split('T').next().unwrap_or(raw);
    if let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDate::parse_from_str(date_part, "%Y/%m/%d").ok()
}

pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_hhmm(*time))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_hhmm(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid HH:MM time: '{raw}'")))
}
