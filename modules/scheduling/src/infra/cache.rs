use std::sync::Arc;

use cafe_kvcache::{KvError, KvStore, KvStoreExt};

use crate::domain::model::ShiftAssignment;

/// Cache key holding the unified shift record set.
pub const SHIFT_CACHE_KEY: &str = "cafe_unified_shifts";

/// Local persistence of the shift book. A missing or corrupt entry reads
/// back as an empty set; the store layer already logs the corruption.
#[derive(Clone)]
pub struct ShiftCache {
    store: Arc<dyn KvStore>,
}

impl ShiftCache {
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Load the cached record set.
    ///
    /// # Errors
    /// Underlying store failures only; absent or undecodable data is an
    /// empty set, not an error.
    pub fn load(&self) -> Result<Vec<ShiftAssignment>, KvError> {
        Ok(self
            .store
            .get::<Vec<ShiftAssignment>>(SHIFT_CACHE_KEY)?
            .unwrap_or_default())
    }

    /// Persist the full record set, replacing whatever was cached.
    ///
    /// # Errors
    /// Underlying store failures.
    pub fn save(&self, entries: &[ShiftAssignment]) -> Result<(), KvError> {
        self.store.put(SHIFT_CACHE_KEY, &entries)
    }
}
