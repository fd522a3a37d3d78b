//! Operating calendar, shift-slot catalog, week partition and staff roster.
//!
//! Everything here is static session configuration: loaded once, validated
//! once, then consumed as pure lookups by the allocation and attendance
//! engines. There are no side effects and no runtime mutation; an unknown
//! date simply resolves to "not operating" (empty slot set, no week).

mod catalog;
mod config;
mod error;
mod model;
pub mod timefmt;


pub use catalog::Catalog;
pub use config::{CatalogConfig, OperationPeriod, PunchTolerance};
pub use error::CatalogError;
pub use model::{
    DayPeriod, OperatingDate, Slot, SlotId, Staff, StaffId, StaffRole, Week, WeekKey,
};
