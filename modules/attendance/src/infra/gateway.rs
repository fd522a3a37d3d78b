use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};
use tracing::warn;
use uuid::Uuid;

use cafe_catalog::{Catalog, SlotId, StaffId};
use cafe_remote::{ApiClient, RemoteConfig, RemoteError};

use crate::domain::model::{ClockPunch, ClockType, PunchStatus};
use crate::domain::ports::AttendanceRemote;
use crate::infra::wire;

/// Gateway to the spreadsheet-backed attendance log. Inbound rows are
/// normalized against the catalog; malformed rows are dropped with a
/// warning.
pub struct ClockGateway {
    client: ApiClient,
    catalog: Arc<Catalog>,
}

impl ClockGateway {
    /// # Errors
    /// TLS initialization failures from the underlying client.
    pub fn new(config: &RemoteConfig, catalog: Arc<Catalog>) -> Result<Self, RemoteError> {
        Ok(Self {
            client: ApiClient::new(config)?,
            catalog,
        })
    }
}

#[async_trait]
impl AttendanceRemote for ClockGateway {
    async fn records_for(&self, date: NaiveDate) -> Result<Vec<ClockPunch>, RemoteError> {
        let response = self
            .client
            .call("getRecords", json!({ "date": date.format("%Y-%m-%d").to_string() }))
            .await?;
        let rows = response
            .get("records")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let mut punches = Vec::with_capacity(rows.len());
        for row in rows {
            match punch_from_row(&self.catalog, &row) {
                Some(punch) => punches.push(punch),
                None => warn!(%row, "dropping malformed punch row"),
            }
        }
        Ok(punches)
    }

    async fn punch(&self, record: &ClockPunch) -> Result<(), RemoteError> {
        self.client
            .call("punch", serde_json::to_value(record)?)
            .await?;
        Ok(())
    }
}

/// Rebuild a punch from a wire row. Rows missing direction, time or a
/// resolvable slot are unusable and dropped. A missing status is
/// re-derived from the slot window rather than defaulted to normal.
fn punch_from_row(catalog: &Catalog, row: &Value) -> Option<ClockPunch> {
    let staff_id = StaffId::new(wire::string_field(row, &["staffId", "staff_id"])?);
    let date = wire::parse_date(&wire::string_field(row, &["date"])?)?;
    let slot_id = SlotId::new(wire::string_field(row, &["slotId", "slot"])?);
    let slot = catalog.slot(&slot_id)?;
    let clock_type = parse_clock_type(&wire::string_field(row, &["clockType", "type"])?)?;
    let time = wire::parse_time(&wire::string_field(row, &["time"])?)?;

    let status = wire::string_field(row, &["status"])
        .and_then(|raw| parse_status(&raw))
        .unwrap_or_else(|| crate::domain::classify::status_for(slot, clock_type, time));

    Some(ClockPunch {
        id: wire::string_field(row, &["id"]).unwrap_or_else(|| Uuid::new_v4().to_string()),
        staff_id: staff_id.clone(),
        staff_name: wire::string_field(row, &["staffName", "name"])
            .or_else(|| catalog.staff(&staff_id).map(|s| s.name.clone()))
            .unwrap_or_default(),
        date,
        slot_id,
        slot_label: wire::string_field(row, &["slotLabel", "slot_label"])
            .unwrap_or_else(|| slot.label.clone()),
        clock_type,
        time,
        status,
        timestamp: wire::parse_timestamp(row, &["timestamp", "createdAt", "created_at"]),
    })
}

fn parse_clock_type(raw: &str) -> Option<ClockType> {
    match raw {
        "in" => Some(ClockType::In),
        "out" => Some(ClockType::Out),
        _ => None,
    }
}

fn parse_status(raw: &str) -> Option<PunchStatus> {
    match raw {
        "normal" => Some(PunchStatus::Normal),
        "late" => Some(PunchStatus::Late),
        "early_leave" => Some(PunchStatus::EarlyLeave),
        _ => None,
    }
}
