//! Shift record store, allocation engine and reconciliation.
//!
//! The domain layer owns the allocation rules: a candidate `(staff, date,
//! slot)` must land on an open slot of an operating date, a staff member
//! holds at most one assignment per week, and capacity is advisory only.
//! The record set is merged from two sources, the spreadsheet-backed
//! remote service (authoritative when reachable) and the local cache, with
//! the remote set replacing the local one wholesale on every sync.
//!
//! `infra` adapts the outside world: the remote gateway speaks the action
//! envelope protocol, the cache repository persists the book, and the
//! legacy importer normalizes records from the two predecessor systems.

pub mod config;
pub mod domain;
pub mod infra;

pub use config::{ConflictPolicy, SchedulingConfig};
pub use domain::error::SchedulingError;
pub use domain::model::{FillState, SessionMode, ShiftAssignment};
pub use domain::ports::ScheduleRemote;
pub use domain::service::{AllocationService, SyncReport};
pub use infra::cache::ShiftCache;
pub use infra::gateway::SheetGateway;
pub use infra::legacy::{MigrationReport, migrate_legacy_shifts};
