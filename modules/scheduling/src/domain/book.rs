use chrono::NaiveDate;

use cafe_catalog::{SlotId, StaffId, WeekKey};

use crate::config::ConflictPolicy;
use crate::domain::model::ShiftAssignment;

/// In-memory set of shift assignments: the merged view over the remote
/// result set and the local cache. The reconciliation path is the only
/// writer; the allocation engine reads and proposes.
#[derive(Debug, Default)]
pub struct ShiftBook {
    entries: Vec<ShiftAssignment>,
}

impl ShiftBook {
    #[must_use]
    pub fn new(entries: Vec<ShiftAssignment>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn all(&self) -> &[ShiftAssignment] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn for_staff<'a>(
        &'a self,
        staff_id: &'a StaffId,
    ) -> impl Iterator<Item = &'a ShiftAssignment> {
        self.entries.iter().filter(move |a| &a.staff_id == staff_id)
    }

    pub fn for_slot<'a>(
        &'a self,
        date: NaiveDate,
        slot_id: &'a SlotId,
    ) -> impl Iterator<Item = &'a ShiftAssignment> {
        self.entries
            .iter()
            .filter(move |a| a.date == date && &a.slot_id == slot_id)
    }

    /// How many assignments in `week_key` the staff member holds.
    #[must_use]
    pub fn count_for_staff_week(&self, staff_id: &StaffId, week_key: WeekKey) -> usize {
        self.entries
            .iter()
            .filter(|a| &a.staff_id == staff_id && a.week_key == week_key)
            .count()
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ShiftAssignment> {
        self.entries.iter().find(|a| a.id == id)
    }

    /// Whether an identical logical booking (staff, date, slot) exists.
    #[must_use]
    pub fn contains_booking(&self, candidate: &ShiftAssignment) -> bool {
        self.entries.iter().any(|a| a.same_booking(candidate))
    }

    pub fn insert(&mut self, assignment: ShiftAssignment) {
        self.entries.push(assignment);
    }

    /// Insert `candidate` under the given conflict policy. Returns false
    /// when an existing record of the same booking won and the candidate
    /// was dropped.
    pub fn insert_with_policy(
        &mut self,
        candidate: ShiftAssignment,
        policy: ConflictPolicy,
    ) -> bool {
        match self.entries.iter().position(|a| a.same_booking(&candidate)) {
            None => {
                self.entries.push(candidate);
                true
            }
            Some(index) => match policy {
                ConflictPolicy::FirstWriteWins => false,
                ConflictPolicy::LastWriteWins => {
                    self.entries[index] = candidate;
                    true
                }
            },
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<ShiftAssignment> {
        let index = self.entries.iter().position(|a| a.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Replace the whole collection; used when the remote result set is
    /// taken as authoritative.
    pub fn replace_all(&mut self, entries: Vec<ShiftAssignment>) {
        self.entries = entries;
    }
}
