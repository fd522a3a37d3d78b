use std::collections::HashMap;

use parking_lot::RwLock;

use crate::{KvError, KvStore};

/// In-memory [`KvStore`] for tests and cache-less sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put_raw(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.entries
            .write()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        self.entries.write().remove(key);
        Ok(())
    }
}
