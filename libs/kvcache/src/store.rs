use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::KvError;

/// A flat key-value store holding one JSON document per logical key.
///
/// Implementations only deal in raw strings; typed access goes through
/// [`KvStoreExt`], which owns the serialization policy (corrupt values read
/// as absent).
pub trait KvStore: Send + Sync {
    /// Fetch the raw serialized value for `key`, if present.
    ///
    /// # Errors
    /// Returns an error when the backend itself fails (not for a missing key).
    fn get_raw(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Store the raw serialized value under `key`, replacing any prior value.
    ///
    /// # Errors
    /// Returns an error when the backend cannot persist the value.
    fn put_raw(&self, key: &str, value: &str) -> Result<(), KvError>;

    /// Remove `key`. Removing an absent key is a no-op.
    ///
    /// # Errors
    /// Returns an error when the backend fails to delete an existing value.
    fn remove(&self, key: &str) -> Result<(), KvError>;
}

/// Typed convenience layer over [`KvStore`].
pub trait KvStoreExt: KvStore {
    /// Fetch and deserialize the value under `key`.
    ///
    /// A value that is present but does not parse is logged and treated as
    /// absent, mirroring how the original front end swallowed corrupt
    /// `localStorage` entries instead of failing the whole session.
    ///
    /// # Errors
    /// Returns an error only for backend failures.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KvError> {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "discarding corrupt cache value");
                Ok(None)
            }
        }
    }

    /// Serialize and store `value` under `key`.
    ///
    /// # Errors
    /// Returns an error if serialization or the backend write fails.
    fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), KvError> {
        let raw = serde_json::to_string(value).map_err(|e| KvError::serde(key, e))?;
        self.put_raw(key, &raw)
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}
