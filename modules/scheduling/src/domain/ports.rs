use async_trait::async_trait;

use cafe_remote::RemoteError;

use crate::domain::model::ShiftAssignment;

/// Port to the remote shift service (the server of record).
///
/// `submit` answers the service's own weekly-uniqueness verdict:
/// a [`RemoteError::Rejected`] with code `WEEKLY_LIMIT` is authoritative
/// and overrides whatever the client-side snapshot said.
#[async_trait]
pub trait ScheduleRemote: Send + Sync {
    /// Fetch the full assignment set.
    ///
    /// # Errors
    /// Transport failures (`Timeout`, `Unreachable`, `Status`) mean the
    /// caller should fall back to the local cache.
    async fn fetch_all(&self) -> Result<Vec<ShiftAssignment>, RemoteError>;

    /// Submit new assignments for server-side validation and storage.
    ///
    /// # Errors
    /// `Rejected { code: "WEEKLY_LIMIT" }` when the server's own weekly
    /// check fails; transport errors otherwise.
    async fn submit(&self, submissions: &[ShiftAssignment]) -> Result<(), RemoteError>;

    /// Delete an assignment by id.
    ///
    /// # Errors
    /// Transport or rejection errors; callers treat a failed remote delete
    /// as a warning and still remove locally.
    async fn delete(&self, shift_id: &str) -> Result<(), RemoteError>;
}
