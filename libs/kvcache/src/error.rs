use thiserror::Error;

/// Errors raised by a [`crate::KvStore`] backend.
#[derive(Error, Debug)]
pub enum KvError {
    #[error("cache io error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cache serialization error for key '{key}': {source}")]
    Serde {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl KvError {
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }

    pub fn serde(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serde {
            key: key.into(),
            source,
        }
    }
}
