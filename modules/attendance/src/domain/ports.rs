use async_trait::async_trait;
use chrono::NaiveDate;

use cafe_remote::RemoteError;

use crate::domain::model::ClockPunch;

/// Port to the remote attendance log.
#[async_trait]
pub trait AttendanceRemote: Send + Sync {
    /// Fetch all punches recorded for one date.
    ///
    /// # Errors
    /// Transport failures mean the caller should fall back to the cache.
    async fn records_for(&self, date: NaiveDate) -> Result<Vec<ClockPunch>, RemoteError>;

    /// Record one punch.
    ///
    /// # Errors
    /// Transport or rejection errors.
    async fn punch(&self, record: &ClockPunch) -> Result<(), RemoteError>;
}
