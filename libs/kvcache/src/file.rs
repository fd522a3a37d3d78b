use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::{KvError, KvStore};

/// File-backed [`KvStore`]: one JSON document per key under a cache
/// directory. Writes go through a temp file and rename so readers never see
/// a half-written value.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, KvError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| KvError::io(dir.display().to_string(), e))?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvStore for FileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, KvError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KvError::io(key, e)),
        }
    }

    fn put_raw(&self, key: &str, value: &str) -> Result<(), KvError> {
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| KvError::io(key, e))?;
        tmp.write_all(value.as_bytes())
            .map_err(|e| KvError::io(key, e))?;
        tmp.persist(self.path_for(key))
            .map_err(|e| KvError::io(key, e.error))?;
        debug!(key, bytes = value.len(), "cache value written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(KvError::io(key, e)),
        }
    }
}
