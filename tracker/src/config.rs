//! Tracker configuration
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `ESCALATIONS_*` environment variables (highest precedence).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{TrackerError, TrackerResult};
use crate::sort::SortKey;

pub const ENV_DATA: &str = "ESCALATIONS_DATA";
pub const ENV_URL: &str = "ESCALATIONS_URL";
pub const ENV_USER: &str = "ESCALATIONS_USER";
pub const ENV_TIMEOUT: &str = "ESCALATIONS_TIMEOUT_SECS";
pub const ENV_SORT: &str = "ESCALATIONS_SORT";

/// Where records are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    /// Local JSON document
    File(PathBuf),
    /// REST backend base URL
    Http(String),
}

/// Optional on-disk settings; every key may be omitted
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    data: Option<PathBuf>,
    url: Option<String>,
    user: Option<String>,
    timeout_secs: Option<u64>,
    sort: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// JSON store path, used when no URL is configured
    pub data_path: PathBuf,
    /// REST base URL; overrides the file store when set
    pub base_url: Option<String>,
    /// Authenticated subject; `None` means anonymous
    pub user: Option<String>,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Initial listing order
    pub default_sort: SortKey,
}

impl TrackerConfig {
    /// Built-in defaults, before any file or environment overrides
    pub fn builtin() -> Self {
        Self {
            data_path: PathBuf::from("escalations.json"),
            base_url: None,
            user: None,
            timeout: Duration::from_secs(10),
            default_sort: SortKey::default(),
        }
    }

    /// Load from an optional TOML file, then apply the environment
    pub fn load(path: Option<&Path>) -> TrackerResult<Self> {
        let mut config = Self::builtin();
        if let Some(path) = path {
            let text = std::fs::read_to_string(path).map_err(|e| TrackerError::Config {
                message: format!("cannot read {}: {}", path.display(), e),
            })?;
            config.apply_toml(&text)?;
        }
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Merge values from a TOML document
    pub fn apply_toml(&mut self, text: &str) -> TrackerResult<()> {
        let file: FileConfig = toml::from_str(text).map_err(|e| TrackerError::Config {
            message: e.to_string(),
        })?;

        if let Some(data) = file.data {
            self.data_path = data;
        }
        if let Some(url) = file.url {
            self.base_url = Some(url);
        }
        if let Some(user) = file.user {
            self.user = Some(user);
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(sort) = file.sort {
            self.default_sort = parse_sort(&sort)?;
        }
        Ok(())
    }

    /// Merge values from an environment lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> TrackerResult<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(data) = get(ENV_DATA) {
            self.data_path = PathBuf::from(data);
        }
        if let Some(url) = get(ENV_URL) {
            self.base_url = Some(url);
        }
        if let Some(user) = get(ENV_USER) {
            self.user = Some(user);
        }
        if let Some(secs) = get(ENV_TIMEOUT) {
            let secs: u64 = secs.trim().parse().map_err(|_| TrackerError::Config {
                message: format!(
                    "{} must be a whole number of seconds, got {:?}",
                    ENV_TIMEOUT, secs
                ),
            })?;
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(sort) = get(ENV_SORT) {
            self.default_sort = parse_sort(&sort)?;
        }
        Ok(())
    }

    /// Which data source this configuration selects
    pub fn source(&self) -> SourceConfig {
        match &self.base_url {
            Some(url) => SourceConfig::Http(url.clone()),
            None => SourceConfig::File(self.data_path.clone()),
        }
    }
}

fn parse_sort(raw: &str) -> TrackerResult<SortKey> {
    raw.parse()
        .map_err(|message: String| TrackerError::Config { message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::{SortDirection, SortField};
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_builtin_defaults() {
        let config = TrackerConfig::builtin();
        assert_eq!(config.source(), SourceConfig::File(PathBuf::from("escalations.json")));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.default_sort, SortKey::default());
        assert!(config.user.is_none());
    }

    #[test]
    fn test_env_overrides_toml() {
        let mut config = TrackerConfig::builtin();
        config
            .apply_toml(
                r#"
                data = "/srv/escalations.json"
                user = "from-file"
                sort = "title"
                "#,
            )
            .unwrap();
        config
            .apply_env(env(&[(ENV_USER, "from-env"), (ENV_SORT, "status:desc")]))
            .unwrap();

        assert_eq!(config.data_path, PathBuf::from("/srv/escalations.json"));
        assert_eq!(config.user.as_deref(), Some("from-env"));
        assert_eq!(
            config.default_sort,
            SortKey::new(SortField::EscalationStatus, SortDirection::Descending)
        );
    }

    #[test]
    fn test_url_selects_http_source() {
        let mut config = TrackerConfig::builtin();
        config
            .apply_env(env(&[(ENV_URL, "https://tracker.example/api")]))
            .unwrap();
        assert_eq!(
            config.source(),
            SourceConfig::Http("https://tracker.example/api".to_string())
        );
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let mut config = TrackerConfig::builtin();
        config.apply_env(env(&[(ENV_USER, "  ")])).unwrap();
        assert!(config.user.is_none());
    }

    #[test]
    fn test_load_reports_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = TrackerConfig::load(Some(missing.as_path())).unwrap_err();
        assert_eq!(err.code(), "CONFIG");

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "timeout_secs = \"soon\"").unwrap();
        let err = TrackerConfig::load(Some(bad.as_path())).unwrap_err();
        assert_eq!(err.code(), "CONFIG");
    }

    #[test]
    fn test_bad_values_are_config_errors() {
        let mut config = TrackerConfig::builtin();
        let err = config.apply_env(env(&[(ENV_TIMEOUT, "soon")])).unwrap_err();
        assert_eq!(err.code(), "CONFIG");

        let err = config.apply_toml("colour = \"blue\"").unwrap_err();
        assert_eq!(err.code(), "CONFIG");

        let err = config.apply_toml("sort = \"priority\"").unwrap_err();
        assert_eq!(err.code(), "CONFIG");
    }
}
