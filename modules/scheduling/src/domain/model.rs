use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cafe_catalog::{Catalog, Slot, SlotId, Staff, StaffId, WeekKey, timefmt};

/// One accepted shift registration. Never mutated in place: cancellation
/// removes the record and a new submission creates a fresh one.
///
/// The name, label and window fields are denormalized copies of catalog
/// data; the spreadsheet rows carry them so exports stay readable without
/// joins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftAssignment {
    pub id: String,
    pub staff_id: StaffId,
    #[serde(default)]
    pub staff_name: String,
    pub week_key: WeekKey,
    pub date: NaiveDate,
    pub slot_id: SlotId,
    #[serde(default)]
    pub slot_label: String,
    #[serde(with = "timefmt")]
    pub start_time: NaiveTime,
    #[serde(with = "timefmt")]
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

impl ShiftAssignment {
    /// Build a fresh assignment for an accepted allocation.
    #[must_use]
    pub fn create(
        staff: &Staff,
        date: NaiveDate,
        week_key: WeekKey,
        slot: &Slot,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            staff_id: staff.id.clone(),
            staff_name: staff.name.clone(),
            week_key,
            date,
            slot_id: slot.id.clone(),
            slot_label: slot.label.clone(),
            start_time: slot.start,
            end_time: slot.end,
            created_at,
        }
    }

    /// Two assignments are the same logical booking when they share staff,
    /// date and slot, regardless of id.
    #[must_use]
    pub fn same_booking(&self, other: &Self) -> bool {
        self.staff_id == other.staff_id && self.date == other.date && self.slot_id == other.slot_id
    }
}

/// Derived display classification of a slot's staffing level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillState {
    /// The viewing staff member already holds this slot.
    Mine,
    /// Quota reached or exceeded. Submission is still allowed; capacity is
    /// advisory.
    Full { count: usize, required: usize },
    Partial { count: usize, required: usize },
    Empty { required: usize },
}

/// Whether the session is backed by the remote service or degraded to the
/// local cache only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Online,
    CacheOnly,
}

/// Compute the fill state of `(date, slot)` for display, given how many
/// assignments it holds and who is looking.
#[must_use]
pub fn classify_fill(
    catalog: &Catalog,
    slot_id: &SlotId,
    count: usize,
    viewer_holds_slot: bool,
) -> FillState {
    let required = catalog.required_staff(slot_id) as usize;
    if viewer_holds_slot {
        FillState::Mine
    } else if count >= required {
        FillState::Full { count, required }
    } else if count > 0 {
        FillState::Partial { count, required }
    } else {
        FillState::Empty { required }
    }
}
