//! One-shot import of punch records left behind by the two predecessor
//! systems. The older one keyed punches by staff name and called the
//! direction field `type`; records are normalized against the catalog and
//! deduplicated on the logical event before the old keys are removed.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use cafe_catalog::{Catalog, SlotId, StaffId};
use cafe_kvcache::{KvError, KvStore, KvStoreExt};

use crate::domain::classify;
use crate::domain::model::{ClockPunch, ClockType, PunchStatus};
use crate::infra::cache::PunchCache;
use crate::infra::wire;

/// Cache keys written by the predecessor systems, oldest first.
const LEGACY_CLOCK_KEYS: [&str; 2] = ["attendance_records", "clock_records"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PunchMigrationReport {
    pub imported: usize,
    /// Records dropped because the same logical event (staff, date, slot,
    /// direction, time) was already present.
    pub duplicates: usize,
    /// Records that could not be normalized.
    pub skipped: usize,
}

/// Merge legacy punch records into the unified cache entry. Existing
/// unified records always win; legacy keys are deleted only after the
/// merged log is saved.
///
/// # Errors
/// Underlying store failures.
#[instrument(skip(store, catalog))]
pub fn migrate_legacy_punches(
    store: &Arc<dyn KvStore>,
    catalog: &Catalog,
) -> Result<PunchMigrationReport, KvError> {
    let cache = PunchCache::new(Arc::clone(store));
    let mut log = cache.load()?;
    let mut report = PunchMigrationReport::default();

    for key in LEGACY_CLOCK_KEYS {
        let Some(rows) = store.get::<Vec<Value>>(key)? else {
            continue;
        };
        info!(key, rows = rows.len(), "importing legacy punch records");
        for row in &rows {
            match punch_from_legacy(catalog, row) {
                Some(punch) => {
                    if log.iter().any(|p| p.same_event(&punch)) {
                        report.duplicates += 1;
                    } else {
                        log.push(punch);
                        report.imported += 1;
                    }
                }
                None => {
                    warn!(key, %row, "skipping unusable legacy punch");
                    report.skipped += 1;
                }
            }
        }
    }

    cache.save(&log)?;
    for key in LEGACY_CLOCK_KEYS {
        store.remove(key)?;
    }
    info!(
        imported = report.imported,
        duplicates = report.duplicates,
        skipped = report.skipped,
        "legacy punch migration finished"
    );
    Ok(report)
}

fn punch_from_legacy(catalog: &Catalog, row: &Value) -> Option<ClockPunch> {
    let staff = match wire::string_field(row, &["staffId", "staff_id", "memberId"]) {
        Some(id) => catalog.staff(&StaffId::new(id))?,
        None => catalog.staff_by_name(&wire::string_field(row, &["staffName", "name"])?)?,
    };
    let date = wire::parse_date(&wire::string_field(row, &["date"])?)?;
    let slot_id = SlotId::new(wire::string_field(row, &["slotId", "slot", "slotKey"])?);
    let slot = catalog.slot(&slot_id)?;
    let clock_type = match wire::string_field(row, &["clockType", "type"])?.as_str() {
        "in" => ClockType::In,
        "out" => ClockType::Out,
        _ => return None,
    };
    let time = wire::parse_time(&wire::string_field(row, &["time"])?)?;
    let status = match wire::string_field(row, &["status"]).as_deref() {
        Some("normal") => PunchStatus::Normal,
        Some("late") => PunchStatus::Late,
        Some("early_leave") => PunchStatus::EarlyLeave,
        _ => classify::status_for(slot, clock_type, time),
    };

    Some(ClockPunch {
        id: wire::string_field(row, &["id"]).unwrap_or_else(|| Uuid::new_v4().to_string()),
        staff_id: staff.id.clone(),
        staff_name: staff.name.clone(),
        date,
        slot_id,
        slot_label: slot.label.clone(),
        clock_type,
        time,
        status,
        timestamp: wire::parse_timestamp(row, &["timestamp", "createdAt", "created_at"]),
    })
}
