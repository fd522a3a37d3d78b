use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::warn;
use uuid::Uuid;

use cafe_catalog::{Catalog, SlotId, StaffId, WeekKey};
use cafe_remote::{ApiClient, RemoteConfig, RemoteError};

use crate::domain::model::ShiftAssignment;
use crate::domain::ports::ScheduleRemote;
use crate::infra::wire;

/// Gateway to the spreadsheet-backed shift service.
///
/// Outbound records go out in canonical form; inbound rows are normalized
/// against the catalog (slot windows, week membership) and malformed rows
/// are dropped with a warning rather than poisoning the whole sync.
pub struct SheetGateway {
    client: ApiClient,
    catalog: Arc<Catalog>,
}

impl SheetGateway {
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
impl ScheduleRemote for SheetGateway {
    async fn fetch_all(&self) -> Result<Vec<ShiftAssignment>, RemoteError> {
        let response = self.client.call("getAllShifts", Value::Null).await?;
        let rows = response
            .get("shifts")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let mut shifts = Vec::with_capacity(rows.len());
        for row in rows {
            match shift_from_row(&self.catalog, &row) {
                Some(shift) => shifts.push(shift),
                None => warn!(%row, "dropping malformed shift row"),
            }
        }
        Ok(shifts)
    }

    async fn submit(&self, submissions: &[ShiftAssignment]) -> Result<(), RemoteError> {
        self.client
            .call("submitShifts", json!({ "shifts": submissions }))
            .await?;
        Ok(())
    }

    async fn delete(&self, shift_id: &str) -> Result<(), RemoteError> {
        self.client
            .call("deleteShift", json!({ "shiftId": shift_id }))
            .await?;
        Ok(())
    }
}

/// Rebuild an assignment from a wire row, filling gaps from the catalog.
/// Rows whose slot or week cannot be resolved are unusable and dropped.
fn shift_from_row(catalog: &Catalog, row: &Value) -> Option<ShiftAssignment> {
    let staff_id = StaffId::new(wire::string_field(row, &["staffId", "staff_id"])?);
    let date = wire::parse_date(&wire::string_field(row, &["date"])?)?;
    let slot_id = SlotId::new(wire::string_field(row, &["slotId", "slot"])?);
    let slot = catalog.slot(&slot_id)?;

    let week_key = wire::string_field(row, &["weekKey", "week_key"])
        .and_then(|raw| wire::parse_date(&raw))
        .map(WeekKey::new)
        .or_else(|| catalog.week_key_of(date))?;

    let staff_name = wire::string_field(row, &["staffName", "name"])
        .or_else(|| catalog.staff(&staff_id).map(|s| s.name.clone()))
        .unwrap_or_default();
    let start_time = wire::string_field(row, &["startTime", "start_time"])
        .and_then(|raw| wire::parse_time(&raw))
        .unwrap_or(slot.start);
    let end_time = wire::string_field(row, &["endTime", "end_time"])
        .and_then(|raw| wire::parse_time(&raw))
        .unwrap_or(slot.end);

    Some(ShiftAssignment {
        id: wire::string_field(row, &["id"]).unwrap_or_else(|| Uuid::new_v4().to_string()),
        staff_id,
        staff_name,
        week_key,
        date,
        slot_id,
        slot_label: wire::string_field(row, &["slotLabel", "slot_label"])
            .unwrap_or_else(|| slot.label.clone()),
        start_time,
        end_time,
        created_at: wire::parse_timestamp(row, &["createdAt", "created_at", "timestamp"]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_catalog::CatalogConfig;

    fn catalog() -> Catalog {
        let config: CatalogConfig = serde_saphyr::from_str(
            r#"
cafe_name: "Test Cafe"
operation_period:
  start: 2026-08-03
  end: 2026-08-30
slots:
  - id: AM_A
    label: "morning A"
    start: "10:00"
    end: "12:30"
    period: morning
operating_dates:
  - date: 2026-08-03
    slots: [AM_A]
weeks:
  - week_key: 2026-08-03
    label: "week 1"
    dates: [2026-08-03]
staff:
  - id: "7"
    name: "Aoi"
"#,
        )
        .unwrap();
        Catalog::new(config).unwrap()
    }

    #[test]
    fn spreadsheet_row_quirks_are_normalized() {
        let catalog = catalog();
        let row = json!({
            "id": 99,
            "staffId": 7,
            "date": "2026/8/3",
            "slot": "AM_A",
            "startTime": "2026-08-03T10:00:00.000Z"
        });
        // The datetime in startTime is not an HH:MM, so the slot window
        // fills in.
        let shift = shift_from_row(&catalog, &row).expect("row should normalize");
        assert_eq!(shift.id, "99");
        assert_eq!(shift.staff_id.as_str(), "7");
        assert_eq!(shift.staff_name, "Aoi");
        assert_eq!(shift.week_key, WeekKey::new(shift.date));
        assert_eq!(shift.start_time, slot_time(10, 0));
        assert_eq!(shift.end_time, slot_time(12, 30));
    }

    #[test]
    fn row_with_unknown_slot_is_dropped() {
        let catalog = catalog();
        let row = json!({"staffId": "7", "date": "2026-08-03", "slotId": "PM_Z"});
        assert!(shift_from_row(&catalog, &row).is_none());
    }

    #[test]
    fn row_outside_every_week_is_dropped() {
        let catalog = catalog();
        let row = json!({"staffId": "7", "date": "2026-08-10", "slotId": "AM_A"});
        assert!(shift_from_row(&catalog, &row).is_none());
    }

    fn slot_time(h: u32, m: u32) -> chrono::NaiveTime {
        chrono::NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }
}
