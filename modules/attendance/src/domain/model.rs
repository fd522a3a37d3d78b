use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cafe_catalog::{Slot, SlotId, Staff, StaffId, timefmt};

/// One clock-in or clock-out event. The status is fixed at recording time
/// against the slot window in force that day and never recomputed.
///
/// `time` is what the user punched (wall clock, `HH:MM`); `timestamp` is
/// the recording instant and orders punches within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockPunch {
    pub id: String,
    pub staff_id: StaffId,
    #[serde(default)]
    pub staff_name: String,
    pub date: NaiveDate,
    pub slot_id: SlotId,
    #[serde(default)]
    pub slot_label: String,
    pub clock_type: ClockType,
    #[serde(with = "timefmt")]
    pub time: NaiveTime,
    pub status: PunchStatus,
    pub timestamp: DateTime<Utc>,
}

impl ClockPunch {
    /// Build a fresh punch for an accepted recording.
    #[must_use]
    pub fn create(
        staff: &Staff,
        date: NaiveDate,
        slot: &Slot,
        clock_type: ClockType,
        time: NaiveTime,
        status: PunchStatus,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            staff_id: staff.id.clone(),
            staff_name: staff.name.clone(),
            date,
            slot_id: slot.id.clone(),
            slot_label: slot.label.clone(),
            clock_type,
            time,
            status,
            timestamp,
        }
    }

    /// Two punches are the same logical event when staff, date, slot,
    /// direction and punched time all match. Ids differ across the systems
    /// that produced them, so they do not participate.
    #[must_use]
    pub fn same_event(&self, other: &Self) -> bool {
        self.staff_id == other.staff_id
            && self.date == other.date
            && self.slot_id == other.slot_id
            && self.clock_type == other.clock_type
            && self.time == other.time
    }
}

/// Direction of a punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockType {
    In,
    Out,
}

/// Classification fixed when the punch is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchStatus {
    Normal,
    Late,
    EarlyLeave,
}

/// Where a `(staff, date, slot)` stands, derived from its latest punch by
/// timestamp. `ClockedOut` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchState {
    NotClockedIn,
    ClockedIn,
    ClockedOut,
}
