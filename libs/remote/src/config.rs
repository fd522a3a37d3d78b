use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for the remote shift service endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    /// Web app endpoint; all actions POST to this one URL.
    pub base_url: Url,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// When false, the session runs cache-only and never contacts the
    /// remote service.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl RemoteConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether the endpoint is usable: enabled and served over HTTPS.
    /// Mirrors the front end's config validity check.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.enabled && self.base_url.scheme() == "https"
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_enabled() -> bool {
    true
}
