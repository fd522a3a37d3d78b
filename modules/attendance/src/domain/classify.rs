//! Status derivation, punch pairing and worked-duration arithmetic.

use chrono::NaiveTime;

use cafe_catalog::{Slot, SlotId};

use crate::domain::model::{ClockPunch, ClockType, PunchStatus};

/// Minutes in a day, for the midnight-wrap rule.
const DAY_MINUTES: i64 = 24 * 60;

/// Classify a punch against the slot window. Arriving after the slot has
/// started is late; leaving before it ends is an early leave. Punching
/// exactly on the boundary is normal in both directions.
#[must_use]
pub fn status_for(slot: &Slot, clock_type: ClockType, time: NaiveTime) -> PunchStatus {
    match clock_type {
        ClockType::In if time > slot.start => PunchStatus::Late,
        ClockType::Out if time < slot.end => PunchStatus::EarlyLeave,
        _ => PunchStatus::Normal,
    }
}

/// Minutes worked between a clock-in and a clock-out. An out time earlier
/// on the clock than the in time is read as crossing midnight rather than
/// as a negative span.
#[must_use]
pub fn worked_minutes(clock_in: NaiveTime, clock_out: NaiveTime) -> i64 {
    (clock_out - clock_in).num_minutes().rem_euclid(DAY_MINUTES)
}

/// Format minutes as `H:MM` (hours unpadded, as the day totals are shown).
#[must_use]
pub fn format_duration(minutes: i64) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// A matched in/out pair within one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkedPeriod {
    pub slot_id: SlotId,
    pub clock_in: NaiveTime,
    pub clock_out: NaiveTime,
    pub minutes: i64,
}

/// Pair one staff member's punches per slot in timestamp order. An `in`
/// opens a period, the next `out` in the same slot closes it; unmatched
/// punches (still clocked in, or stray outs) contribute nothing.
#[must_use]
pub fn pair_punches(punches: &[ClockPunch]) -> Vec<WorkedPeriod> {
    let mut ordered: Vec<&ClockPunch> = punches.iter().collect();
    ordered.sort_by_key(|p| p.timestamp);

    let mut open: Vec<(SlotId, NaiveTime)> = Vec::new();
    let mut periods = Vec::new();
    for punch in ordered {
        match punch.clock_type {
            ClockType::In => {
                open.retain(|(slot_id, _)| slot_id != &punch.slot_id);
                open.push((punch.slot_id.clone(), punch.time));
            }
            ClockType::Out => {
                if let Some(index) = open.iter().position(|(slot_id, _)| slot_id == &punch.slot_id)
                {
                    let (slot_id, clock_in) = open.remove(index);
                    periods.push(WorkedPeriod {
                        minutes: worked_minutes(clock_in, punch.time),
                        slot_id,
                        clock_in,
                        clock_out: punch.time,
                    });
                }
            }
        }
    }
    periods
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_catalog::DayPeriod;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn slot() -> Slot {
        Slot {
            id: SlotId::from("PM_A"),
            label: "Afternoon A".to_owned(),
            start: time(15, 0),
            end: time(16, 30),
            period: DayPeriod::Afternoon,
            required_staff: None,
        }
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn boundary_punches_are_normal() {
        let slot = slot();
        assert_eq!(status_for(&slot, ClockType::In, time(15, 5)), PunchStatus::Late);
        assert_eq!(status_for(&slot, ClockType::In, time(15, 0)), PunchStatus::Normal);
        assert_eq!(status_for(&slot, ClockType::In, time(14, 50)), PunchStatus::Normal);
        assert_eq!(
            status_for(&slot, ClockType::Out, time(16, 20)),
            PunchStatus::EarlyLeave
        );
        assert_eq!(status_for(&slot, ClockType::Out, time(16, 30)), PunchStatus::Normal);
        assert_eq!(status_for(&slot, ClockType::Out, time(16, 45)), PunchStatus::Normal);
    }

    #[test]
    fn duration_formats_hours_and_padded_minutes() {
        let minutes = worked_minutes(time(10, 0), time(11, 35));
        assert_eq!(minutes, 95);
        assert_eq!(format_duration(minutes), "1:35");
        assert_eq!(format_duration(worked_minutes(time(15, 0), time(16, 30))), "1:30");
        assert_eq!(format_duration(0), "0:00");
    }

    #[test]
    fn out_before_in_on_the_clock_wraps_midnight() {
        assert_eq!(worked_minutes(time(23, 30), time(0, 15)), 45);
    }

    #[test]
    fn pairing_follows_timestamp_order_and_skips_open_periods() {
        let staff = cafe_catalog::Staff {
            id: cafe_catalog::StaffId::from("7"),
            name: "Aoi".to_owned(),
            role: cafe_catalog::StaffRole::default(),
        };
        let date = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
        let slot = slot();
        let at = |secs: i64| Utc.timestamp_opt(1_770_000_000 + secs, 0).unwrap();

        let punches = [
            ClockPunch::create(
                &staff,
                date,
                &slot,
                ClockType::In,
                time(15, 0),
                PunchStatus::Normal,
                at(0),
            ),
            ClockPunch::create(
                &staff,
                date,
                &slot,
                ClockType::Out,
                time(16, 30),
                PunchStatus::Normal,
                at(60),
            ),
            // A second stint in the same slot, still open.
            ClockPunch::create(
                &staff,
                date,
                &slot,
                ClockType::In,
                time(17, 0),
                PunchStatus::Late,
                at(120),
            ),
        ];

        let periods = pair_punches(&punches);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].minutes, 90);
        assert_eq!(periods[0].clock_in, time(15, 0));
        assert_eq!(periods[0].clock_out, time(16, 30));
    }
}
