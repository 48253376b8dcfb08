//! Client configuration
//!
//! Resolution order: defaults, then `~/.chargeview/config.json`, then the
//! `CHARGEVIEW_BASE_URL` environment variable, then command-line flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::{ChargeviewError, Result};

/// Environment variable overriding the backend base URL
pub const BASE_URL_ENV: &str = "CHARGEVIEW_BASE_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend report API root, e.g. `http://localhost:8000`
    pub base_url: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Poll interval for summary views in `watch`
    pub poll_interval_secs: u64,
    /// Poll interval for the trend view in `watch`
    pub trend_poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            poll_interval_secs: 10,
            trend_poll_interval_secs: 5,
        }
    }
}

impl Config {
    /// Load from the default path and apply the environment override
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        let config = Self::load_from(&path)?;
        config.with_base_url(std::env::var(BASE_URL_ENV).ok())
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            ChargeviewError::Config(format!("invalid config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config path (~/.chargeview/config.json)
    pub fn default_path() -> Result<PathBuf> {
        let home = directories::UserDirs::new()
            .ok_or_else(|| ChargeviewError::Config("Failed to get home directory".into()))?
            .home_dir()
            .to_path_buf();
        Ok(home.join(".chargeview").join("config.json"))
    }

    /// Replace the base URL when an override is given (empty is ignored)
    pub fn with_base_url(mut self, base_url: Option<String>) -> Result<Self> {
        if let Some(url) = base_url.map(|u| u.trim().to_string()) {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ChargeviewError::Config(format!(
                "base_url must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ChargeviewError::Config("timeout_secs must be > 0".into()));
        }
        if self.poll_interval_secs == 0 || self.trend_poll_interval_secs == 0 {
            return Err(ChargeviewError::Config("poll intervals must be > 0".into()));
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn trend_poll_interval(&self) -> Duration {
        Duration::from_secs(self.trend_poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.trend_poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"base_url": "https://costs.internal/", "timeout_secs": 3}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url, "https://costs.internal/");
        assert_eq!(config.api_root(), "https://costs.internal");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.poll_interval_secs, 10);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ChargeviewError::Config(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"poll_interval_secs": 0}"#).unwrap();
        assert!(Config::load_from(&path).is_err());

        fs::write(&path, r#"{"base_url": "localhost:8000"}"#).unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_base_url_override() {
        let config = Config::default()
            .with_base_url(Some("http://reports:9000".into()))
            .unwrap();
        assert_eq!(config.base_url, "http://reports:9000");

        let unchanged = Config::default().with_base_url(Some("  ".into())).unwrap();
        assert_eq!(unchanged.base_url, DEFAULT_BASE_URL);

        assert!(Config::default()
            .with_base_url(Some("ftp://nope".into()))
            .is_err());
    }
}
