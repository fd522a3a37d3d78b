use std::sync::Arc;

use cafe_kvcache::{KvError, KvStore, KvStoreExt};

use crate::domain::model::ClockPunch;

/// Cache key holding the unified punch log, all dates together.
pub const CLOCK_CACHE_KEY: &str = "cafe_unified_clock";

/// Local persistence of the punch log. A missing or corrupt entry reads
/// back as an empty log; the store layer already logs the corruption.
#[derive(Clone)]
pub struct PunchCache {
    store: Arc<dyn KvStore>,
}

impl PunchCache {
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Load the cached punch log.
    ///
    /// # Errors
    /// Underlying store failures only.
    pub fn load(&self) -> Result<Vec<ClockPunch>, KvError> {
        Ok(self
            .store
            .get::<Vec<ClockPunch>>(CLOCK_CACHE_KEY)?
            .unwrap_or_default())
    }

    /// Persist the full punch log, replacing whatever was cached.
    ///
    /// # Errors
    /// Underlying store failures.
    pub fn save(&self, punches: &[ClockPunch]) -> Result<(), KvError> {
        self.store.put(CLOCK_CACHE_KEY, &punches)
    }
}
