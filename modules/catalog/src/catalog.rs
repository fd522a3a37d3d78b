use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::config::{CatalogConfig, PunchTolerance};
use crate::error::CatalogError;
use crate::model::{OperatingDate, Slot, SlotId, Staff, StaffId, Week, WeekKey};

/// Validated, read-only view over the session configuration.
///
/// Built once per session; every accessor is a pure lookup. A date absent
/// from the calendar is simply non-operating: empty slot set, no week key,
/// no assignments possible.
#[derive(Debug)]
pub struct Catalog {
    slots: BTreeMap<SlotId, Slot>,
    dates: BTreeMap<NaiveDate, OperatingDate>,
    weeks: Vec<Week>,
    week_by_key: HashMap<WeekKey, usize>,
    week_of_date: HashMap<NaiveDate, WeekKey>,
    staff: Vec<Staff>,
    staff_by_id: HashMap<StaffId, usize>,
    default_required_staff: u32,
    weekly_shift_limit: u32,
    punch_tolerance: PunchTolerance,
}

impl Catalog {
    /// Validate `config` and build the lookup tables.
    ///
    /// # Errors
    /// Returns the first configuration inconsistency found; see
    /// [`CatalogError`] for the full list of invariants.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let mut slots = BTreeMap::new();
        for slot in config.slots {
            if slot.start >= slot.end {
                return Err(CatalogError::InvalidSlotWindow { slot_id: slot.id });
            }
            if slot.required_staff == Some(0) {
                return Err(CatalogError::ZeroRequiredStaff { slot_id: slot.id });
            }
            if slots.insert(slot.id.clone(), slot.clone()).is_some() {
                return Err(CatalogError::DuplicateSlot { slot_id: slot.id });
            }
        }

        let mut dates = BTreeMap::new();
        for op_date in config.operating_dates {
            for slot_id in &op_date.slots {
                if !slots.contains_key(slot_id) {
                    return Err(CatalogError::UnknownSlot {
                        date: op_date.date,
                        slot_id: slot_id.clone(),
                    });
                }
            }
            if dates.insert(op_date.date, op_date.clone()).is_some() {
                return Err(CatalogError::DuplicateDate { date: op_date.date });
            }
        }

        let mut week_by_key = HashMap::new();
        let mut week_of_date = HashMap::new();
        for (index, week) in config.weeks.iter().enumerate() {
            week_by_key.insert(week.week_key, index);
            for date in &week.dates {
                if !dates.contains_key(date) {
                    return Err(CatalogError::WeekDateNotOperating {
                        week_key: week.week_key,
                        date: *date,
                    });
                }
                if week_of_date.insert(*date, week.week_key).is_some() {
                    return Err(CatalogError::DateInTwoWeeks { date: *date });
                }
            }
        }

        let mut staff_by_id = HashMap::new();
        for (index, member) in config.staff.iter().enumerate() {
            if staff_by_id.insert(member.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateStaff {
                    staff_id: member.id.clone(),
                });
            }
        }

        Ok(Self {
            slots,
            dates,
            weeks: config.weeks,
            week_by_key,
            week_of_date,
            staff: config.staff,
            staff_by_id,
            default_required_staff: config.default_required_staff.max(1),
            weekly_shift_limit: config.weekly_shift_limit.max(1),
            punch_tolerance: config.punch_tolerance,
        })
    }

    // ---- Calendar & slot catalog -------------------------------------

    #[must_use]
    pub fn is_operating_date(&self, date: NaiveDate) -> bool {
        self.dates.contains_key(&date)
    }

    #[must_use]
    pub fn operating_date(&self, date: NaiveDate) -> Option<&OperatingDate> {
        self.dates.get(&date)
    }

    /// Slots open on `date`, in catalog order. Unknown date yields an
    /// empty set.
    #[must_use]
    pub fn available_slots(&self, date: NaiveDate) -> Vec<&Slot> {
        self.dates
            .get(&date)
            .map(|op| op.slots.iter().filter_map(|id| self.slots.get(id)).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_slot_open(&self, date: NaiveDate, slot_id: &SlotId) -> bool {
        self.dates
            .get(&date)
            .is_some_and(|op| op.slots.contains(slot_id))
    }

    #[must_use]
    pub fn slot(&self, slot_id: &SlotId) -> Option<&Slot> {
        self.slots.get(slot_id)
    }

    /// Staffing quota for `slot_id`, falling back to the catalog-wide
    /// default when the slot has no quota of its own (or is unknown).
    #[must_use]
    pub fn required_staff(&self, slot_id: &SlotId) -> u32 {
        self.slots
            .get(slot_id)
            .and_then(|slot| slot.required_staff)
            .unwrap_or(self.default_required_staff)
    }

    /// All operating dates in calendar order.
    pub fn operating_dates(&self) -> impl Iterator<Item = &OperatingDate> {
        self.dates.values()
    }

    /// Total number of open (date, slot) cells across the season.
    #[must_use]
    pub fn total_slot_count(&self) -> usize {
        self.dates.values().map(|op| op.slots.len()).sum()
    }

    // ---- Week partition ----------------------------------------------

    /// Week containing `date`, by membership in the configured week lists.
    /// `None` for dates outside every week.
    #[must_use]
    pub fn week_key_of(&self, date: NaiveDate) -> Option<WeekKey> {
        self.week_of_date.get(&date).copied()
    }

    #[must_use]
    pub fn week(&self, week_key: WeekKey) -> Option<&Week> {
        self.week_by_key.get(&week_key).map(|&i| &self.weeks[i])
    }

    #[must_use]
    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    #[must_use]
    pub fn weekly_shift_limit(&self) -> u32 {
        self.weekly_shift_limit
    }

    // ---- Roster ------------------------------------------------------

    #[must_use]
    pub fn staff(&self, staff_id: &StaffId) -> Option<&Staff> {
        self.staff_by_id.get(staff_id).map(|&i| &self.staff[i])
    }

    /// Lookup by display name; legacy punch records are keyed by name only.
    #[must_use]
    pub fn staff_by_name(&self, name: &str) -> Option<&Staff> {
        self.staff.iter().find(|member| member.name == name)
    }

    #[must_use]
    pub fn roster(&self) -> &[Staff] {
        &self.staff
    }

    #[must_use]
    pub fn punch_tolerance(&self) -> &PunchTolerance {
        &self.punch_tolerance
    }
}
