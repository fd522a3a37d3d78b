use chrono::NaiveDate;
use thiserror::Error;

use cafe_catalog::{SlotId, StaffId};
use cafe_kvcache::KvError;
use cafe_remote::RemoteError;

/// Domain errors of the attendance engine. State-machine violations are
/// raised before any mutation.
#[derive(Error, Debug)]
pub enum AttendanceError {
    /// Clock-out without a preceding clock-in for the slot.
    #[error("staff {staff_id} has not clocked in to {slot_id} on {date}")]
    OutBeforeIn {
        staff_id: StaffId,
        date: NaiveDate,
        slot_id: SlotId,
    },

    /// A second clock-in while one is already open.
    #[error("staff {staff_id} is already clocked in to {slot_id} on {date}")]
    AlreadyClockedIn {
        staff_id: StaffId,
        date: NaiveDate,
        slot_id: SlotId,
    },

    /// Any punch after the slot was clocked out; the state is terminal.
    #[error("staff {staff_id} has already clocked out of {slot_id} on {date}")]
    AlreadyClockedOut {
        staff_id: StaffId,
        date: NaiveDate,
        slot_id: SlotId,
    },

    /// The date is not an operating date, or the slot is not open on it.
    #[error("slot {slot_id} is not open on {date}")]
    SlotUnavailable { date: NaiveDate, slot_id: SlotId },

    /// Punching staff id is not on the roster.
    #[error("unknown staff id {staff_id}")]
    UnknownStaff { staff_id: StaffId },

    /// Remote failure with no local fallback defined.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Local cache failure.
    #[error(transparent)]
    Cache(#[from] KvError),
}

impl AttendanceError {
    /// Stable machine-readable code, as surfaced to callers and logs.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::OutBeforeIn { .. } => "OUT_BEFORE_IN",
            Self::AlreadyClockedIn { .. } => "ALREADY_CLOCKED_IN",
            Self::AlreadyClockedOut { .. } => "ALREADY_CLOCKED_OUT",
            Self::SlotUnavailable { .. } => "SLOT_UNAVAILABLE",
            Self::UnknownStaff { .. } => "UNKNOWN_STAFF",
            Self::Remote(RemoteError::Timeout) => "TIMEOUT",
            Self::Remote(_) => "REMOTE_UNREACHABLE",
            Self::Cache(_) => "CACHE_ERROR",
        }
    }
}
