use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use cafe_catalog::{Catalog, CatalogConfig, SlotId, StaffId};
use cafe_kvcache::{KvStore, MemoryStore};
use cafe_remote::RemoteError;

use crate::domain::error::SchedulingError;
use crate::domain::model::{FillState, SessionMode, ShiftAssignment};
use crate::domain::ports::ScheduleRemote;
use crate::domain::service::AllocationService;
use crate::infra::cache::ShiftCache;

const SEASON_YAML: &str = r#"
cafe_name: Kyoso Cafe
slots:
  - { id: AM_A, label: Morning A, start: "10:00", end: "11:30", period: morning }
  - { id: PM_A, label: Afternoon A, start: "15:00", end: "16:30", period: afternoon }
  - { id: PM_B, label: Afternoon B, start: "15:30", end: "17:00", period: afternoon, required_staff: 2 }
operating_dates:
  - { date: 2026-01-14, slots: [PM_A, PM_B] }
  - { date: 2026-01-15, slots: [PM_A, PM_B] }
  - { date: 2026-01-16, slots: [AM_A, PM_A] }
  - { date: 2026-01-19, slots: [PM_A, PM_B] }
weeks:
  - week_key: 2026-01-12
    label: week of 1/12
    dates: [2026-01-14, 2026-01-15, 2026-01-16]
  - week_key: 2026-01-19
    label: week of 1/19
    dates: [2026-01-19]
staff:
  - { id: "25011003", name: Rimi Obata }
  - { id: "25011754", name: Takumi Yamazaki, role: admin }
  - { id: "25011900", name: Hana Mori }
"#;

#[derive(Default)]
struct MockRemote {
    shifts: Mutex<Vec<ShiftAssignment>>,
    reject_weekly: bool,
    fail_transport: AtomicBool,
    fail_delete: bool,
    deleted: Mutex<Vec<String>>,
}

impl MockRemote {
    fn unreachable() -> Self {
        Self {
            fail_transport: AtomicBool::new(true),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ScheduleRemote for MockRemote {
    async fn fetch_all(&self) -> Result<Vec<ShiftAssignment>, RemoteError> {
        if self.fail_transport.load(Ordering::SeqCst) {
            return Err(RemoteError::Timeout);
        }
        Ok(self.shifts.lock().clone())
    }

    async fn submit(&self, submissions: &[ShiftAssignment]) -> Result<(), RemoteError> {
        if self.fail_transport.load(Ordering::SeqCst) {
            return Err(RemoteError::Unreachable("connection refused".into()));
        }
        if self.reject_weekly {
            return Err(RemoteError::rejected("WEEKLY_LIMIT"));
        }
        self.shifts.lock().extend_from_slice(submissions);
        Ok(())
    }

    async fn delete(&self, shift_id: &str) -> Result<(), RemoteError> {
        if self.fail_delete {
            return Err(RemoteError::Status(500));
        }
        self.shifts.lock().retain(|s| s.id != shift_id);
        self.deleted.lock().push(shift_id.to_owned());
        Ok(())
    }
}

struct Fixture {
    service: AllocationService,
    remote: Arc<MockRemote>,
    store: Arc<dyn KvStore>,
}

impl Fixture {
    fn cached(&self) -> Vec<ShiftAssignment> {
        ShiftCache::new(Arc::clone(&self.store)).load().unwrap()
    }
}

fn fixture(remote: MockRemote) -> Fixture {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    fixture_on(remote, &store)
}

fn fixture_on(remote: MockRemote, store: &Arc<dyn KvStore>) -> Fixture {
    let config: CatalogConfig = serde_saphyr::from_str(SEASON_YAML).unwrap();
    let catalog = Arc::new(Catalog::new(config).unwrap());
    let remote = Arc::new(remote);
    let service = AllocationService::new(
        catalog,
        Some(remote.clone() as Arc<dyn ScheduleRemote>),
        ShiftCache::new(Arc::clone(store)),
    );
    Fixture {
        service,
        remote,
        store: Arc::clone(store),
    }
}

fn rimi() -> StaffId {
    StaffId::from("25011003")
}

fn takumi() -> StaffId {
    StaffId::from("25011754")
}

fn hana() -> StaffId {
    StaffId::from("25011900")
}

fn date(s: &str) -> chrono::NaiveDate {
    s.parse().unwrap()
}

#[tokio::test]
async fn allocate_then_release_then_rebook_within_the_week() {
    let fx = fixture(MockRemote::default());
    fx.service.sync().await.unwrap();

    let first = fx
        .service
        .allocate(&rimi(), date("2026-01-14"), &SlotId::from("PM_A"))
        .await
        .unwrap();
    assert_eq!(
        fx.service
            .fill_state(date("2026-01-14"), &SlotId::from("PM_A"), None),
        FillState::Partial {
            count: 1,
            required: 3
        }
    );

    // A second slot in the same week is refused.
    let err = fx
        .service
        .allocate(&rimi(), date("2026-01-15"), &SlotId::from("PM_B"))
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulingError::WeeklyLimitExceeded { .. }));

    // Cancelling frees the week again.
    fx.service.cancel(&first.id).await.unwrap();
    assert_eq!(fx.remote.deleted.lock().as_slice(), [first.id.clone()]);
    fx.service
        .allocate(&rimi(), date("2026-01-15"), &SlotId::from("PM_B"))
        .await
        .unwrap();

    // A different week is independent.
    fx.service
        .allocate(&rimi(), date("2026-01-19"), &SlotId::from("PM_A"))
        .await
        .unwrap();
    assert_eq!(fx.service.assignments_for_staff(&rimi()).len(), 2);
}

#[tokio::test]
async fn closed_slot_and_non_operating_date_are_unavailable() {
    let fx = fixture(MockRemote::default());
    fx.service.sync().await.unwrap();

    // AM_A exists in the catalog but is not open on the 14th.
    let err = fx
        .service
        .allocate(&rimi(), date("2026-01-14"), &SlotId::from("AM_A"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "SLOT_UNAVAILABLE");

    let err = fx
        .service
        .allocate(&rimi(), date("2026-01-17"), &SlotId::from("PM_A"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "SLOT_UNAVAILABLE");
    assert!(fx.service.assignments().is_empty());
}

#[tokio::test]
async fn unknown_staff_is_refused() {
    let fx = fixture(MockRemote::default());
    fx.service.sync().await.unwrap();

    let err = fx
        .service
        .allocate(
            &StaffId::from("99999999"),
            date("2026-01-14"),
            &SlotId::from("PM_A"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "UNKNOWN_STAFF");
}

#[tokio::test]
async fn server_weekly_verdict_overrides_the_local_snapshot() {
    let fx = fixture(MockRemote {
        reject_weekly: true,
        ..MockRemote::default()
    });
    fx.service.sync().await.unwrap();

    // Locally the week looks free, but the server knows better.
    let err = fx
        .service
        .allocate(&rimi(), date("2026-01-14"), &SlotId::from("PM_A"))
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulingError::WeeklyLimitExceeded { .. }));

    // Nothing was committed anywhere and the session stays online.
    assert!(fx.service.assignments().is_empty());
    assert!(fx.cached().is_empty());
    assert_eq!(fx.service.mode(), SessionMode::Online);
}

#[tokio::test]
async fn unreachable_sync_degrades_to_the_cache() {
    // Seed the cache through a working session first.
    let seed = fixture(MockRemote::default());
    seed.service.sync().await.unwrap();
    let kept = seed
        .service
        .allocate(&rimi(), date("2026-01-14"), &SlotId::from("PM_A"))
        .await
        .unwrap();

    let offline = fixture_on(MockRemote::unreachable(), &seed.store);
    let report = offline.service.sync().await.unwrap();
    assert_eq!(report.mode, SessionMode::CacheOnly);
    assert_eq!(report.assignments, 1);
    assert_eq!(offline.service.assignments()[0].id, kept.id);
}

#[tokio::test]
async fn cache_only_session_rejects_identical_resubmission_as_duplicate() {
    let fx = fixture(MockRemote::unreachable());
    fx.service.sync().await.unwrap();
    assert_eq!(fx.service.mode(), SessionMode::CacheOnly);

    fx.service
        .allocate(&rimi(), date("2026-01-14"), &SlotId::from("PM_A"))
        .await
        .unwrap();
    // Duplicate outranks the weekly rule for the identical booking.
    let err = fx
        .service
        .allocate(&rimi(), date("2026-01-14"), &SlotId::from("PM_A"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "DUPLICATE");
    assert_eq!(fx.service.assignments().len(), 1);
}

#[tokio::test]
async fn transport_failure_on_submit_falls_back_to_local_commit() {
    let fx = fixture(MockRemote::default());
    fx.service.sync().await.unwrap();

    // The remote dies between sync and submit.
    fx.remote.fail_transport.store(true, Ordering::SeqCst);
    let accepted = fx
        .service
        .allocate(&rimi(), date("2026-01-14"), &SlotId::from("PM_A"))
        .await
        .unwrap();

    // Committed to the cache only; the session degraded.
    assert!(fx.remote.shifts.lock().is_empty());
    assert_eq!(fx.cached()[0].id, accepted.id);
    assert_eq!(fx.service.mode(), SessionMode::CacheOnly);
}

#[tokio::test]
async fn cancel_unknown_id_is_not_found() {
    let fx = fixture(MockRemote::default());
    fx.service.sync().await.unwrap();

    let err = fx.service.cancel("no-such-id").await.unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn cancel_removes_locally_even_when_the_remote_delete_fails() {
    let fx = fixture(MockRemote {
        fail_delete: true,
        ..MockRemote::default()
    });
    fx.service.sync().await.unwrap();

    let shift = fx
        .service
        .allocate(&rimi(), date("2026-01-14"), &SlotId::from("PM_A"))
        .await
        .unwrap();
    let removed = fx.service.cancel(&shift.id).await.unwrap();
    assert_eq!(removed.id, shift.id);
    assert!(fx.service.assignments().is_empty());
    assert!(fx.cached().is_empty());
    // The remote copy survives; the next sync surfaces it again.
    assert_eq!(fx.remote.shifts.lock().len(), 1);
}

#[tokio::test]
async fn sync_replaces_the_local_set_wholesale() {
    let fx = fixture(MockRemote::default());
    fx.service.sync().await.unwrap();
    fx.service
        .allocate(&rimi(), date("2026-01-14"), &SlotId::from("PM_A"))
        .await
        .unwrap();

    // The server-side set changes out from under us.
    let other = fixture(MockRemote::default());
    other.service.sync().await.unwrap();
    let foreign = other
        .service
        .allocate(&takumi(), date("2026-01-15"), &SlotId::from("PM_B"))
        .await
        .unwrap();
    {
        let mut shifts = fx.remote.shifts.lock();
        shifts.clear();
        shifts.push(foreign.clone());
    }

    let report = fx.service.sync().await.unwrap();
    assert_eq!(report.assignments, 1);
    let assignments = fx.service.assignments();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].id, foreign.id);
    // The cache mirrors the authoritative set.
    assert_eq!(fx.cached()[0].id, foreign.id);
}

#[tokio::test]
async fn fill_states_track_count_quota_and_viewer() {
    let fx = fixture(MockRemote::default());
    fx.service.sync().await.unwrap();
    let pm_b = SlotId::from("PM_B");
    let day = date("2026-01-14");

    assert_eq!(
        fx.service.fill_state(day, &pm_b, None),
        FillState::Empty { required: 2 }
    );

    fx.service.allocate(&rimi(), day, &pm_b).await.unwrap();
    assert_eq!(
        fx.service.fill_state(day, &pm_b, None),
        FillState::Partial {
            count: 1,
            required: 2
        }
    );
    // The holder sees their own slot, not its fill level.
    assert_eq!(
        fx.service.fill_state(day, &pm_b, Some(&rimi())),
        FillState::Mine
    );

    fx.service.allocate(&takumi(), day, &pm_b).await.unwrap();
    assert_eq!(
        fx.service.fill_state(day, &pm_b, None),
        FillState::Full {
            count: 2,
            required: 2
        }
    );
}

#[tokio::test]
async fn full_slot_still_accepts_an_allocation() {
    let fx = fixture(MockRemote::default());
    fx.service.sync().await.unwrap();
    let pm_b = SlotId::from("PM_B");
    let day = date("2026-01-14");

    fx.service.allocate(&rimi(), day, &pm_b).await.unwrap();
    fx.service.allocate(&takumi(), day, &pm_b).await.unwrap();
    assert_eq!(
        fx.service.fill_state(day, &pm_b, None),
        FillState::Full {
            count: 2,
            required: 2
        }
    );

    // Quota reached, yet a third booking is still accepted.
    fx.service.allocate(&hana(), day, &pm_b).await.unwrap();
    assert_eq!(fx.service.fill_count(day, &pm_b), 3);
}
