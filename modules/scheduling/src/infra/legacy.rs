//! One-shot import of shift records left behind by the two predecessor
//! systems. Their cache entries use divergent field names and date shapes;
//! records are normalized against the catalog, merged into the unified set
//! under the configured conflict policy, and the old keys are removed once
//! the merge is saved.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use cafe_catalog::{Catalog, SlotId, StaffId, WeekKey};
use cafe_kvcache::{KvError, KvStore, KvStoreExt};

use crate::config::ConflictPolicy;
use crate::domain::book::ShiftBook;
use crate::domain::model::ShiftAssignment;
use crate::infra::cache::ShiftCache;
use crate::infra::wire;

/// Cache keys written by the predecessor systems, oldest first. Insertion
/// order matters under first-write-wins.
const LEGACY_SHIFT_KEYS: [&str; 2] = ["attendance_shift_requests", "shift_submissions"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    /// Records merged into the unified set.
    pub imported: usize,
    /// Records dropped because the same booking was already present.
    pub duplicates: usize,
    /// Records that could not be normalized (unknown staff or slot, date
    /// outside the configured weeks, unparseable fields).
    pub skipped: usize,
}

/// Merge legacy shift records into the unified cache entry.
///
/// Existing unified records always take precedence over legacy ones; the
/// policy only arbitrates among records of the same booking. Legacy keys
/// are deleted only after the merged set is saved, so a failed run leaves
/// them intact for a retry.
///
/// # Errors
/// Underlying store failures.
#[instrument(skip(store, catalog))]
pub fn migrate_legacy_shifts(
    store: &Arc<dyn KvStore>,
    catalog: &Catalog,
    policy: ConflictPolicy,
) -> Result<MigrationReport, KvError> {
    let cache = ShiftCache::new(Arc::clone(store));
    let mut book = ShiftBook::new(cache.load()?);
    let mut report = MigrationReport::default();

    for key in LEGACY_SHIFT_KEYS {
        let Some(rows) = store.get::<Vec<Value>>(key)? else {
            continue;
        };
        info!(key, rows = rows.len(), "importing legacy shift records");
        for row in &rows {
            match shift_from_legacy(catalog, row) {
                Some(shift) => {
                    if book.insert_with_policy(shift, policy) {
                        report.imported += 1;
                    } else {
                        report.duplicates += 1;
                    }
                }
                None => {
                    warn!(key, %row, "skipping unusable legacy record");
                    report.skipped += 1;
                }
            }
        }
    }

    cache.save(book.all())?;
    for key in LEGACY_SHIFT_KEYS {
        store.remove(key)?;
    }
    info!(
        imported = report.imported,
        duplicates = report.duplicates,
        skipped = report.skipped,
        "legacy shift migration finished"
    );
    Ok(report)
}

/// Normalize one legacy record. The older system stored staff names only,
/// so resolution falls back from id to roster name.
fn shift_from_legacy(catalog: &Catalog, row: &Value) -> Option<ShiftAssignment> {
    let staff = match wire::string_field(row, &["staffId", "staff_id", "memberId"]) {
        Some(id) => catalog.staff(&StaffId::new(id))?,
        None => catalog.staff_by_name(&wire::string_field(row, &["staffName", "name"])?)?,
    };
    let date = wire::parse_date(&wire::string_field(row, &["date"])?)?;
    let slot_id = SlotId::new(wire::string_field(row, &["slotId", "slot", "slotKey"])?);
    let slot = catalog.slot(&slot_id)?;
    let week_key = wire::string_field(row, &["weekKey", "week_key"])
        .and_then(|raw| wire::parse_date(&raw))
        .map(WeekKey::new)
        .or_else(|| catalog.week_key_of(date))?;

    Some(ShiftAssignment {
        id: wire::string_field(row, &["id"]).unwrap_or_else(|| Uuid::new_v4().to_string()),
        staff_id: staff.id.clone(),
        staff_name: staff.name.clone(),
        week_key,
        date,
        slot_id,
        slot_label: slot.label.clone(),
        start_time: wire::string_field(row, &["startTime", "start_time"])
            .and_then(|raw| wire::parse_time(&raw))
            .unwrap_or(slot.start),
        end_time: wire::string_field(row, &["endTime", "end_time"])
            .and_then(|raw| wire::parse_time(&raw))
            .unwrap_or(slot.end),
        created_at: wire::parse_timestamp(row, &["createdAt", "created_at", "timestamp"]),
    })
}
