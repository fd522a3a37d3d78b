//! Attendance engine: clock-in/out punches against the slot catalog.
//!
//! A punch is classified at recording time (late arrival, early leave) and
//! never reinterpreted afterwards; the state machine per `(staff, date,
//! slot)` only ever moves forward, from not-clocked-in through clocked-in
//! to clocked-out. Worked durations come from pairing punches in timestamp
//! order.

pub mod domain;
pub mod infra;

pub use domain::classify::{WorkedPeriod, format_duration, pair_punches, worked_minutes};
pub use domain::error::AttendanceError;
pub use domain::model::{ClockPunch, ClockType, PunchState, PunchStatus};
pub use domain::ports::AttendanceRemote;
pub use domain::service::{AttendanceService, ClockMode, DaySummary};
pub use infra::cache::PunchCache;
pub use infra::gateway::ClockGateway;
pub use infra::legacy::{PunchMigrationReport, migrate_legacy_punches};
