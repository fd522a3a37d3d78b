use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{OperatingDate, Slot, Staff, Week};

/// Static configuration for one operating season: slot catalog, operating
/// dates, week partition and roster. Deserialized once from the session
/// config file and turned into a validated [`crate::Catalog`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    #[serde(default)]
    pub cafe_name: String,

    #[serde(default)]
    pub operation_period: Option<OperationPeriod>,

    pub slots: Vec<Slot>,

    #[serde(default)]
    pub operating_dates: Vec<OperatingDate>,

    #[serde(default)]
    pub weeks: Vec<Week>,

    #[serde(default)]
    pub staff: Vec<Staff>,

    /// Quota applied to slots without a `required_staff` of their own.
    #[serde(default = "default_required_staff")]
    pub default_required_staff: u32,

    /// How many assignments one staff member may hold per week.
    #[serde(default = "default_weekly_shift_limit")]
    pub weekly_shift_limit: u32,

    #[serde(default)]
    pub punch_tolerance: PunchTolerance,
}

/// First and last operating day of the active season.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Punch acceptance window around slot boundaries, in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PunchTolerance {
    #[serde(default = "default_early_minutes")]
    pub early_minutes: u32,
    #[serde(default = "default_late_minutes")]
    pub late_minutes: u32,
}

impl Default for PunchTolerance {
    fn default() -> Self {
        Self {
            early_minutes: default_early_minutes(),
            late_minutes: default_late_minutes(),
        }
    }
}

fn default_required_staff() -> u32 {
    3
}

fn default_weekly_shift_limit() -> u32 {
    1
}

fn default_early_minutes() -> u32 {
    10
}

fn default_late_minutes() -> u32 {
    30
}
