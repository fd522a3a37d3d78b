use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{SlotId, StaffId, WeekKey};

/// Validation errors raised while building a [`crate::Catalog`] from its
/// configuration. All of these are configuration mistakes; none can occur
/// at lookup time.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("slot {slot_id} has an invalid window (start must be before end)")]
    InvalidSlotWindow { slot_id: SlotId },

    #[error("slot {slot_id} requires zero staff; quotas must be at least 1")]
    ZeroRequiredStaff { slot_id: SlotId },

    #[error("slot {slot_id} is defined twice")]
    DuplicateSlot { slot_id: SlotId },

    #[error("operating date {date} is listed twice")]
    DuplicateDate { date: NaiveDate },

    #[error("operating date {date} references unknown slot {slot_id}")]
    UnknownSlot { date: NaiveDate, slot_id: SlotId },

    #[error("week {week_key} lists {date}, which is not an operating date")]
    WeekDateNotOperating { week_key: WeekKey, date: NaiveDate },

    #[error("date {date} belongs to more than one week")]
    DateInTwoWeeks { date: NaiveDate },

    #[error("staff id {staff_id} appears twice in the roster")]
    DuplicateStaff { staff_id: StaffId },
}
