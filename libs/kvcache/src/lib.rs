//! Key-value persisted cache for the cafe shift system.
//!
//! The browser front end this system descends from kept its working set in
//! `localStorage`: a flat namespace of logical keys, each holding a JSON
//! document. [`KvStore`] reproduces that contract. [`FileStore`] persists one
//! JSON file per key under a cache directory; [`MemoryStore`] backs tests and
//! degraded sessions.
//!
//! A value that fails to deserialize is treated as absent (with a warning)
//! rather than an error, so a corrupt cache never wedges a session.

mod error;
mod file;
mod memory;
mod store;

pub use error::KvError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{KvStore, KvStoreExt};
