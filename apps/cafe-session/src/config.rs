use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::{Deserialize, Serialize};

use cafe_catalog::CatalogConfig;
use cafe_remote::RemoteConfig;
use cafe_scheduling::SchedulingConfig;

/// Full session configuration: the season catalog, the optional remote
/// endpoint and local cache placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub catalog: CatalogConfig,

    /// Remote shift service; absent or disabled means a cache-only session.
    #[serde(default)]
    pub remote: Option<RemoteConfig>,

    #[serde(default)]
    pub scheduling: SchedulingConfig,

    /// Directory for the JSON cache files.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".cafe-cache")
}

impl AppConfig {
    /// Layered load: YAML file, then `CAFE__*` environment overrides
    /// (`CAFE__CATALOG__WEEKLY_SHIFT_LIMIT=2` style).
    ///
    /// # Errors
    /// Missing file, malformed YAML, or unknown fields.
    pub fn load(path: &Path) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Yaml::file_exact(path))
            .merge(Env::prefixed("CAFE__").split("__"))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL_YAML: &str = r#"
catalog:
  slots:
    - { id: PM_A, label: Afternoon A, start: "15:00", end: "16:30", period: afternoon }
remote:
  base_url: "https://script.example.com/macros/s/abc/exec"
"#;

    #[test]
    fn yaml_file_loads_with_defaults_filled() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL_YAML.as_bytes()).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.catalog.weekly_shift_limit, 1);
        assert_eq!(config.cache_dir, PathBuf::from(".cafe-cache"));
        assert!(config.remote.unwrap().is_configured());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"catalog:\n  slots: []\nsurprise: true\n")
            .unwrap();
        assert!(AppConfig::load(file.path()).is_err());
    }
}
