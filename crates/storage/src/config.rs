//! Storage configuration: local cache directories and the upstream host.

use std::path::{Path, PathBuf};
use std::time::Duration;

use outlook_common::{OutlookError, OutlookResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://www.spc.noaa.gov";

/// Where outlook files are cached and where missing ones are fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Writable cache root; fetched files land under `<data_dir>/geoJSON/SPC/`.
    pub data_dir: PathBuf,
    /// Read-only bundle checked before `data_dir`.
    pub pre_existing_data_dir: Option<PathBuf>,
    /// Upstream host, without a trailing slash.
    pub base_url: String,
    /// Total HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share/spc-overlay"))
            .unwrap_or_else(|| PathBuf::from("data"));

        Self {
            data_dir,
            pre_existing_data_dir: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: format!("spc-overlay/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl StorageConfig {
    /// Defaults overridden by `SPC_*` environment variables.
    pub fn from_env() -> OutlookResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> OutlookResult<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup("SPC_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("SPC_PRE_EXISTING_DATA_DIR") {
            config.pre_existing_data_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = lookup("SPC_BASE_URL") {
            config.base_url = url;
        }
        if let Some(secs) = lookup("SPC_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = secs.trim().parse().map_err(|_| {
                OutlookError::Config(format!(
                    "SPC_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    secs
                ))
            })?;
        }
        if let Some(agent) = lookup("SPC_USER_AGENT") {
            config.user_agent = agent;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a YAML document; missing keys keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> OutlookResult<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| OutlookError::io(path, e))?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> OutlookResult<Self> {
        let config: Self = serde_yaml::from_str(contents)
            .map_err(|e| OutlookError::Config(format!("Invalid storage config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> OutlookResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(OutlookError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(OutlookError::Config(
                "timeouts must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Cache roots in lookup order: the pre-existing bundle, then the data directory.
    pub fn search_roots(&self) -> impl Iterator<Item = &Path> {
        self.pre_existing_data_dir
            .as_deref()
            .into_iter()
            .chain(std::iter::once(self.data_dir.as_path()))
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_pre_existing_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pre_existing_data_dir = Some(dir.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.pre_existing_data_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = StorageConfig::from_lookup(lookup(&[
            ("SPC_DATA_DIR", "/tmp/spc"),
            ("SPC_PRE_EXISTING_DATA_DIR", "/opt/bundle"),
            ("SPC_BASE_URL", "http://localhost:8080"),
            ("SPC_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/spc"));
        assert_eq!(config.pre_existing_data_dir, Some(PathBuf::from("/opt/bundle")));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_env_rejects_bad_timeout() {
        let err =
            StorageConfig::from_lookup(lookup(&[("SPC_REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, OutlookError::Config(_)));
    }

    #[test]
    fn test_yaml_partial_document() {
        let config = StorageConfig::from_yaml_str(
            "data_dir: /var/cache/spc\npre_existing_data_dir: /usr/share/spc\n",
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/cache/spc"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn test_yaml_rejects_non_http_host() {
        assert!(StorageConfig::from_yaml_str("base_url: ftp://spc\n").is_err());
    }

    #[test]
    fn test_search_roots_order() {
        let config = StorageConfig::default()
            .with_data_dir("/data")
            .with_pre_existing_data_dir("/bundle");
        let roots: Vec<_> = config.search_roots().collect();
        assert_eq!(roots, vec![Path::new("/bundle"), Path::new("/data")]);
    }
}
