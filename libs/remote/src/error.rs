use thiserror::Error;

/// Transport and protocol errors from the remote shift service.
///
/// `Timeout` and `Unreachable` are transient: callers fall back to the
/// local cache for reads and surface the failure for writes without a safe
/// local fallback. `Rejected` carries the service's own error code (for
/// example `WEEKLY_LIMIT`) and is authoritative.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("request timed out")]
    Timeout,

    #[error("remote service unreachable: {0}")]
    Unreachable(String),

    #[error("remote service returned HTTP {0}")]
    Status(u16),

    #[error("remote service rejected the request: {code}")]
    Rejected { code: String },

    #[error("invalid response body: {0}")]
    InvalidBody(String),

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] http::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tls initialization failed: {0}")]
    Tls(String),
}

impl RemoteError {
    pub fn rejected(code: impl Into<String>) -> Self {
        Self::Rejected { code: code.into() }
    }

    /// True when retrying later or falling back to the cache is reasonable.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Unreachable(_) | Self::Status(_))
    }
}
