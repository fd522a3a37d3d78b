use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use parking_lot::RwLock;
use tracing::{info, instrument, warn};

use cafe_catalog::{Catalog, Slot, SlotId, StaffId};

use crate::domain::classify::{self, WorkedPeriod};
use crate::domain::error::AttendanceError;
use crate::domain::model::{ClockPunch, ClockType, PunchState};
use crate::domain::ports::AttendanceRemote;
use crate::infra::cache::PunchCache;

/// Whether punches go through the remote log or only into the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockMode {
    Online,
    CacheOnly,
}

/// One staff member's worked time on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    pub periods: Vec<WorkedPeriod>,
    pub total_minutes: i64,
}

impl DaySummary {
    /// Total as `H:MM`.
    #[must_use]
    pub fn formatted_total(&self) -> String {
        classify::format_duration(self.total_minutes)
    }
}

/// The attendance engine: enforces the punch state machine, classifies
/// punches against slot windows, and mirrors accepted punches between the
/// remote log and the local cache.
pub struct AttendanceService {
    catalog: Arc<Catalog>,
    remote: Option<Arc<dyn AttendanceRemote>>,
    cache: PunchCache,
    log: RwLock<Vec<ClockPunch>>,
    mode: RwLock<ClockMode>,
}

impl AttendanceService {
    /// The session starts cache-only until the first [`load_day`].
    ///
    /// [`load_day`]: AttendanceService::load_day
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        remote: Option<Arc<dyn AttendanceRemote>>,
        cache: PunchCache,
    ) -> Self {
        Self {
            catalog,
            remote,
            cache,
            log: RwLock::new(Vec::new()),
            mode: RwLock::new(ClockMode::CacheOnly),
        }
    }

    #[must_use]
    pub fn mode(&self) -> ClockMode {
        *self.mode.read()
    }

    /// Load the punch log for one date, preferring the remote record.
    ///
    /// A reachable remote replaces the date's local entries (other dates in
    /// the cache are kept); on failure the cached log is served and the
    /// session degrades to cache-only.
    ///
    /// # Errors
    /// Only cache failures surface; remote failures degrade the session.
    #[instrument(skip(self))]
    pub async fn load_day(&self, date: NaiveDate) -> Result<Vec<ClockPunch>, AttendanceError> {
        if let Some(remote) = &self.remote {
            match remote.records_for(date).await {
                Ok(records) => {
                    let mut log = self.log.write();
                    *log = self.cache.load()?;
                    log.retain(|p| p.date != date);
                    log.extend(records);
                    self.cache.save(&log)?;
                    *self.mode.write() = ClockMode::Online;
                    info!(%date, punches = log.len(), "attendance log loaded from remote");
                    return Ok(Self::day_of(&log, date));
                }
                Err(e) => {
                    warn!(error = %e, "remote records fetch failed, serving cached punches");
                }
            }
        }

        let mut log = self.log.write();
        *log = self.cache.load()?;
        *self.mode.write() = ClockMode::CacheOnly;
        Ok(Self::day_of(&log, date))
    }

    fn day_of(log: &[ClockPunch], date: NaiveDate) -> Vec<ClockPunch> {
        let mut day: Vec<ClockPunch> = log.iter().filter(|p| p.date == date).cloned().collect();
        day.sort_by_key(|p| p.timestamp);
        day
    }

    /// State of `(staff, date, slot)`, from its latest punch by timestamp.
    #[must_use]
    pub fn punch_state(&self, staff_id: &StaffId, date: NaiveDate, slot_id: &SlotId) -> PunchState {
        let log = self.log.read();
        let latest = log
            .iter()
            .filter(|p| &p.staff_id == staff_id && p.date == date && &p.slot_id == slot_id)
            .max_by_key(|p| p.timestamp);
        match latest.map(|p| p.clock_type) {
            None => PunchState::NotClockedIn,
            Some(ClockType::In) => PunchState::ClockedIn,
            Some(ClockType::Out) => PunchState::ClockedOut,
        }
    }

    /// Record a punch at wall-clock `time`.
    ///
    /// The slot must be open on the date and the state machine must allow
    /// the transition; the punch status is derived from the slot window
    /// here and never recomputed. Online, the remote log is written first;
    /// a transport failure degrades the session and commits to the cache
    /// only.
    ///
    /// # Errors
    /// State-machine violations, `SlotUnavailable`, `UnknownStaff`, remote
    /// rejections and cache failures.
    #[instrument(skip(self), fields(staff = %staff_id, %date, slot = %slot_id))]
    pub async fn record_punch(
        &self,
        staff_id: &StaffId,
        date: NaiveDate,
        slot_id: &SlotId,
        clock_type: ClockType,
        time: NaiveTime,
    ) -> Result<ClockPunch, AttendanceError> {
        let staff = self
            .catalog
            .staff(staff_id)
            .ok_or_else(|| AttendanceError::UnknownStaff {
                staff_id: staff_id.clone(),
            })?
            .clone();
        if !self.catalog.is_slot_open(date, slot_id) {
            return Err(AttendanceError::SlotUnavailable {
                date,
                slot_id: slot_id.clone(),
            });
        }
        let slot = self
            .catalog
            .slot(slot_id)
            .ok_or_else(|| AttendanceError::SlotUnavailable {
                date,
                slot_id: slot_id.clone(),
            })?;

        let state = self.punch_state(staff_id, date, slot_id);
        match (state, clock_type) {
            (PunchState::NotClockedIn, ClockType::In) | (PunchState::ClockedIn, ClockType::Out) => {
            }
            (PunchState::NotClockedIn, ClockType::Out) => {
                return Err(AttendanceError::OutBeforeIn {
                    staff_id: staff_id.clone(),
                    date,
                    slot_id: slot_id.clone(),
                });
            }
            (PunchState::ClockedIn, ClockType::In) => {
                return Err(AttendanceError::AlreadyClockedIn {
                    staff_id: staff_id.clone(),
                    date,
                    slot_id: slot_id.clone(),
                });
            }
            (PunchState::ClockedOut, _) => {
                return Err(AttendanceError::AlreadyClockedOut {
                    staff_id: staff_id.clone(),
                    date,
                    slot_id: slot_id.clone(),
                });
            }
        }

        let status = classify::status_for(slot, clock_type, time);
        let punch = ClockPunch::create(&staff, date, slot, clock_type, time, status, Utc::now());

        if self.mode() == ClockMode::Online {
            if let Some(remote) = &self.remote {
                match remote.punch(&punch).await {
                    Ok(()) => {}
                    Err(e) if e.is_transient() => {
                        warn!(error = %e, "remote punch failed, committing locally only");
                        *self.mode.write() = ClockMode::CacheOnly;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        let mut log = self.log.write();
        log.push(punch.clone());
        self.cache.save(&log)?;
        info!(id = %punch.id, "punch recorded");
        Ok(punch)
    }

    /// Worked periods and total for one staff member on one date.
    #[must_use]
    pub fn day_summary(&self, staff_id: &StaffId, date: NaiveDate) -> DaySummary {
        let log = self.log.read();
        let mine: Vec<ClockPunch> = log
            .iter()
            .filter(|p| &p.staff_id == staff_id && p.date == date)
            .cloned()
            .collect();
        let periods = classify::pair_punches(&mine);
        let total_minutes = periods.iter().map(|p| p.minutes).sum();
        DaySummary {
            periods,
            total_minutes,
        }
    }

    /// The slot whose window contains `now` among the date's open slots.
    #[must_use]
    pub fn current_slot(&self, date: NaiveDate, now: NaiveTime) -> Option<Slot> {
        self.catalog
            .available_slots(date)
            .into_iter()
            .find(|slot| slot.start <= now && now <= slot.end)
            .cloned()
    }

    /// The next slot to open after `now` on the date.
    #[must_use]
    pub fn next_slot(&self, date: NaiveDate, now: NaiveTime) -> Option<Slot> {
        self.catalog
            .available_slots(date)
            .into_iter()
            .filter(|slot| slot.start > now)
            .min_by_key(|slot| slot.start)
            .cloned()
    }

    #[must_use]
    pub fn punches_for(&self, staff_id: &StaffId, date: NaiveDate) -> Vec<ClockPunch> {
        let log = self.log.read();
        let mut mine: Vec<ClockPunch> = log
            .iter()
            .filter(|p| &p.staff_id == staff_id && p.date == date)
            .cloned()
            .collect();
        mine.sort_by_key(|p| p.timestamp);
        mine
    }
}
