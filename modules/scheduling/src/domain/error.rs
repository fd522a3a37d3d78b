use chrono::NaiveDate;
use thiserror::Error;

use cafe_catalog::{SlotId, StaffId, WeekKey};
use cafe_kvcache::KvError;
use cafe_remote::RemoteError;

/// Domain errors of the allocation engine.
///
/// Validation errors are raised at the point of attempted commit, before
/// any mutation; the record store is unchanged whenever one of these is
/// returned.
#[derive(Error, Debug)]
pub enum SchedulingError {
    /// The date is not an operating date, or the slot is not open on it.
    #[error("slot {slot_id} is not open on {date}")]
    SlotUnavailable { date: NaiveDate, slot_id: SlotId },

    /// The staff member already holds an assignment in this week.
    #[error("staff {staff_id} already has a shift in week {week_key}")]
    WeeklyLimitExceeded { staff_id: StaffId, week_key: WeekKey },

    /// Identical (staff, date, slot) booking already exists; raised on the
    /// local-only path, where there is no server to arbitrate.
    #[error("staff {staff_id} is already booked into {slot_id} on {date}")]
    Duplicate {
        staff_id: StaffId,
        date: NaiveDate,
        slot_id: SlotId,
    },

    /// Cancellation target does not exist.
    #[error("no shift assignment with id {id}")]
    NotFound { id: String },

    /// Candidate staff id is not on the roster.
    #[error("unknown staff id {staff_id}")]
    UnknownStaff { staff_id: StaffId },

    /// Remote failure with no local fallback defined.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Local cache failure.
    #[error(transparent)]
    Cache(#[from] KvError),
}

impl SchedulingError {
    /// Stable machine-readable code, as surfaced to callers and logs.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::SlotUnavailable { .. } => "SLOT_UNAVAILABLE",
            Self::WeeklyLimitExceeded { .. } => "WEEKLY_LIMIT_EXCEEDED",
            Self::Duplicate { .. } => "DUPLICATE",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::UnknownStaff { .. } => "UNKNOWN_STAFF",
            Self::Remote(RemoteError::Timeout) => "TIMEOUT",
            Self::Remote(_) => "REMOTE_UNREACHABLE",
            Self::Cache(_) => "CACHE_ERROR",
        }
    }
}
