use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::timefmt;

/// Identifier of a fixed shift slot within an operating day (`AM_A`,
/// `PM_B`, ...). Slots form a fixed catalog; ids are never minted at
/// runtime.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Staff identifier (student number in the roster).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(String);

impl StaffId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StaffId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Canonical identifier of a week grouping: the anchor (Monday) date.
/// Serializes as `YYYY-MM-DD`, matching the wire records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekKey(NaiveDate);

impl WeekKey {
    #[must_use]
    pub fn new(anchor: NaiveDate) -> Self {
        Self(anchor)
    }

    #[must_use]
    pub fn anchor(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Half of the operating day a slot belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Morning,
    Afternoon,
}

/// A fixed, named time window staff can be assigned to. The window is
/// same-day (`start < end`, validated at catalog build).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Slot {
    pub id: SlotId,
    pub label: String,
    #[serde(with = "timefmt")]
    pub start: NaiveTime,
    #[serde(with = "timefmt")]
    pub end: NaiveTime,
    pub period: DayPeriod,
    /// Per-slot staffing quota; falls back to the catalog-wide default
    /// when unset.
    #[serde(default)]
    pub required_staff: Option<u32>,
}

impl Slot {
    /// Window length in minutes.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// A calendar day the cafe operates, with the slots open on that day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperatingDate {
    pub date: NaiveDate,
    pub slots: Vec<SlotId>,
    /// Display annotation ("reception", "last day of preopen", ...).
    #[serde(default)]
    pub label: Option<String>,
}

/// A week grouping used by the one-assignment-per-week rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Week {
    pub week_key: WeekKey,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    pub dates: Vec<NaiveDate>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Admin,
    Leader,
    #[default]
    Staff,
}

/// A roster member. The roster is immutable and loaded once per session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
    #[serde(default)]
    pub role: StaffRole,
}
