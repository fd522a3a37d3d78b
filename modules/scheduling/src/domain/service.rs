use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use tracing::{info, instrument, warn};

use cafe_catalog::{Catalog, SlotId, StaffId, WeekKey};
use cafe_remote::RemoteError;

use crate::domain::book::ShiftBook;
use crate::domain::error::SchedulingError;
use crate::domain::model::{FillState, SessionMode, ShiftAssignment, classify_fill};
use crate::domain::ports::ScheduleRemote;
use crate::infra::cache::ShiftCache;

/// Error code the remote service answers when its own weekly-uniqueness
/// check fails.
const REMOTE_WEEKLY_LIMIT: &str = "WEEKLY_LIMIT";

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub mode: SessionMode,
    pub assignments: usize,
}

/// The allocation engine: validates prospective assignments, commits
/// accepted ones through the remote service when reachable, and keeps the
/// merged record set mirrored into the local cache.
///
/// One instance serves one user session; all remote traffic is a single
/// in-flight request at a time.
pub struct AllocationService {
    catalog: Arc<Catalog>,
    remote: Option<Arc<dyn ScheduleRemote>>,
    cache: ShiftCache,
    book: RwLock<ShiftBook>,
    mode: RwLock<SessionMode>,
}

impl AllocationService {
    /// Build a service over the given catalog, optional remote gateway and
    /// cache. The session starts cache-only until the first [`sync`].
    ///
    /// [`sync`]: AllocationService::sync
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        remote: Option<Arc<dyn ScheduleRemote>>,
        cache: ShiftCache,
    ) -> Self {
        Self {
            catalog,
            remote,
            cache,
            book: RwLock::new(ShiftBook::default()),
            mode: RwLock::new(SessionMode::CacheOnly),
        }
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        *self.mode.read()
    }

    // ---- Reconciliation ----------------------------------------------

    /// Reconcile the record set with the remote service.
    ///
    /// When the remote is reachable its result set replaces the local one
    /// wholesale and is written back to the cache. On any remote failure
    /// the cache becomes the authoritative set and the session degrades to
    /// cache-only, which suppresses online-only behavior until the next
    /// successful sync.
    ///
    /// # Errors
    /// Only cache failures surface; remote failures degrade the session.
    #[instrument(skip(self))]
    pub async fn sync(&self) -> Result<SyncReport, SchedulingError> {
        if let Some(remote) = &self.remote {
            match remote.fetch_all().await {
                Ok(entries) => {
                    self.cache.save(&entries)?;
                    let assignments = entries.len();
                    self.book.write().replace_all(entries);
                    *self.mode.write() = SessionMode::Online;
                    info!(assignments, "shift set loaded from remote");
                    return Ok(SyncReport {
                        mode: SessionMode::Online,
                        assignments,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "remote fetch failed, serving cached shifts");
                }
            }
        }

        let entries = self.cache.load()?;
        let assignments = entries.len();
        self.book.write().replace_all(entries);
        *self.mode.write() = SessionMode::CacheOnly;
        Ok(SyncReport {
            mode: SessionMode::CacheOnly,
            assignments,
        })
    }

    // ---- Validation --------------------------------------------------

    /// Check a candidate `(staff, date, slot)` against the current record
    /// set without committing anything. Returns the week the assignment
    /// would land in.
    ///
    /// # Errors
    /// `SlotUnavailable` when the date is not operating or the slot is not
    /// open that day (a date outside every configured week is rejected the
    /// same way: the weekly rule cannot be evaluated for it, so it is not
    /// allocatable); `Duplicate` for an identical existing booking;
    /// `WeeklyLimitExceeded` when the staff member's week is already used.
    pub fn validate(
        &self,
        staff_id: &StaffId,
        date: NaiveDate,
        slot_id: &SlotId,
    ) -> Result<WeekKey, SchedulingError> {
        if !self.catalog.is_slot_open(date, slot_id) {
            return Err(SchedulingError::SlotUnavailable {
                date,
                slot_id: slot_id.clone(),
            });
        }
        let Some(week_key) = self.catalog.week_key_of(date) else {
            return Err(SchedulingError::SlotUnavailable {
                date,
                slot_id: slot_id.clone(),
            });
        };

        let book = self.book.read();
        if book
            .for_slot(date, slot_id)
            .any(|a| &a.staff_id == staff_id)
        {
            return Err(SchedulingError::Duplicate {
                staff_id: staff_id.clone(),
                date,
                slot_id: slot_id.clone(),
            });
        }
        let limit = self.catalog.weekly_shift_limit() as usize;
        if book.count_for_staff_week(staff_id, week_key) >= limit {
            return Err(SchedulingError::WeeklyLimitExceeded {
                staff_id: staff_id.clone(),
                week_key,
            });
        }
        Ok(week_key)
    }

    // ---- Allocation --------------------------------------------------

    /// Allocate `(staff, date, slot)`.
    ///
    /// The candidate is validated against the current merged set; capacity
    /// is advisory only, so a full slot does not block. Online, the remote
    /// service is the arbiter: its `WEEKLY_LIMIT` rejection wins over the
    /// local snapshot and nothing is committed. On a transport failure the
    /// commit falls back to the local cache and the session degrades.
    ///
    /// # Errors
    /// Validation errors per [`validate`], plus remote rejections.
    ///
    /// [`validate`]: AllocationService::validate
    #[instrument(skip(self), fields(staff = %staff_id, %date, slot = %slot_id))]
    pub async fn allocate(
        &self,
        staff_id: &StaffId,
        date: NaiveDate,
        slot_id: &SlotId,
    ) -> Result<ShiftAssignment, SchedulingError> {
        let staff = self
            .catalog
            .staff(staff_id)
            .ok_or_else(|| SchedulingError::UnknownStaff {
                staff_id: staff_id.clone(),
            })?
            .clone();
        let week_key = self.validate(staff_id, date, slot_id)?;
        let slot = self
            .catalog
            .slot(slot_id)
            .ok_or_else(|| SchedulingError::SlotUnavailable {
                date,
                slot_id: slot_id.clone(),
            })?;
        let assignment = ShiftAssignment::create(&staff, date, week_key, slot, Utc::now());

        if self.mode() == SessionMode::Online {
            if let Some(remote) = &self.remote {
                match remote.submit(std::slice::from_ref(&assignment)).await {
                    Ok(()) => {}
                    Err(RemoteError::Rejected { code }) if code == REMOTE_WEEKLY_LIMIT => {
                        // The server saw an assignment our snapshot missed;
                        // its verdict is authoritative and the speculative
                        // local state is abandoned.
                        return Err(SchedulingError::WeeklyLimitExceeded {
                            staff_id: staff_id.clone(),
                            week_key,
                        });
                    }
                    Err(e) if e.is_transient() => {
                        warn!(error = %e, "remote submit failed, committing locally only");
                        *self.mode.write() = SessionMode::CacheOnly;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        let mut book = self.book.write();
        book.insert(assignment.clone());
        self.cache.save(book.all())?;
        info!(id = %assignment.id, week = %week_key, "shift allocated");
        Ok(assignment)
    }

    /// Cancel an assignment by id.
    ///
    /// Local removal is unconditional once the id is known: a failed
    /// remote delete is logged as a warning so the user is never stuck
    /// with a zombie entry.
    ///
    /// # Errors
    /// `NotFound` for an unknown id; cache failures.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: &str) -> Result<ShiftAssignment, SchedulingError> {
        if self.book.read().find(id).is_none() {
            return Err(SchedulingError::NotFound { id: id.to_owned() });
        }

        if self.mode() == SessionMode::Online {
            if let Some(remote) = &self.remote {
                if let Err(e) = remote.delete(id).await {
                    warn!(id, error = %e, "remote delete failed, removing locally anyway");
                }
            }
        }

        let mut book = self.book.write();
        let removed = book
            .remove(id)
            .ok_or_else(|| SchedulingError::NotFound { id: id.to_owned() })?;
        self.cache.save(book.all())?;
        info!(id, "shift cancelled");
        Ok(removed)
    }

    // ---- Queries -----------------------------------------------------

    #[must_use]
    pub fn fill_count(&self, date: NaiveDate, slot_id: &SlotId) -> usize {
        self.book.read().for_slot(date, slot_id).count()
    }

    /// Fill-state classification of `(date, slot)` for display: `Mine`
    /// when the viewer holds the slot, otherwise empty/partial/full
    /// against the staffing quota.
    #[must_use]
    pub fn fill_state(
        &self,
        date: NaiveDate,
        slot_id: &SlotId,
        viewer: Option<&StaffId>,
    ) -> FillState {
        let book = self.book.read();
        let count = book.for_slot(date, slot_id).count();
        let mine = viewer.is_some_and(|staff_id| {
            book.for_slot(date, slot_id)
                .any(|a| &a.staff_id == staff_id)
        });
        classify_fill(&self.catalog, slot_id, count, mine)
    }

    #[must_use]
    pub fn assignments_for_staff(&self, staff_id: &StaffId) -> Vec<ShiftAssignment> {
        self.book.read().for_staff(staff_id).cloned().collect()
    }

    #[must_use]
    pub fn assignments(&self) -> Vec<ShiftAssignment> {
        self.book.read().all().to_vec()
    }
}
