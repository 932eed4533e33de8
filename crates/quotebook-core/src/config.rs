//! Runtime configuration.
//!
//! Values are layered: the JSON config file first, then `QUOTEBOOK_*`
//! environment variables, then whatever the caller applies on top (CLI flags).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::remote::DEFAULT_REMOTE_TIMEOUT_SECS;
use crate::sync::DEFAULT_SYNC_INTERVAL;
use crate::util::{is_http_url, normalize_text_option};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Public JSON placeholder API used when no remote is configured.
pub const DEFAULT_REMOTE_URL: &str = "https://jsonplaceholder.typicode.com/posts";

pub const ENV_DATA_DIR: &str = "QUOTEBOOK_DATA_DIR";
pub const ENV_REMOTE_URL: &str = "QUOTEBOOK_REMOTE_URL";
pub const ENV_SYNC_INTERVAL_SECS: &str = "QUOTEBOOK_SYNC_INTERVAL_SECS";
pub const ENV_REMOTE_TIMEOUT_SECS: &str = "QUOTEBOOK_REMOTE_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct QuotebookConfig {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub sync_interval_secs: Option<u64>,
    #[serde(default)]
    pub remote_timeout_secs: Option<u64>,
}

impl QuotebookConfig {
    /// Load the config file, treating a missing file as empty.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|error| {
            Error::Config(format!("Failed to parse config at {}: {error}", path.display()))
        })
    }

    /// Apply `QUOTEBOOK_*` variables from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(data_dir) = normalize_text_option(lookup(ENV_DATA_DIR)) {
            self.data_dir = Some(PathBuf::from(data_dir));
        }
        if let Some(remote_url) = normalize_text_option(lookup(ENV_REMOTE_URL)) {
            self.remote_url = Some(remote_url);
        }
        if let Some(raw) = normalize_text_option(lookup(ENV_SYNC_INTERVAL_SECS)) {
            self.sync_interval_secs = Some(parse_seconds(ENV_SYNC_INTERVAL_SECS, &raw)?);
        }
        if let Some(raw) = normalize_text_option(lookup(ENV_REMOTE_TIMEOUT_SECS)) {
            self.remote_timeout_secs = Some(parse_seconds(ENV_REMOTE_TIMEOUT_SECS, &raw)?);
        }
        Ok(self)
    }

    /// Remote endpoint, defaulting to [`DEFAULT_REMOTE_URL`].
    pub fn remote_url(&self) -> Result<String> {
        let url = normalize_text_option(self.remote_url.clone())
            .unwrap_or_else(|| DEFAULT_REMOTE_URL.to_string());
        if is_http_url(&url) {
            Ok(url)
        } else {
            Err(Error::Config(format!(
                "remote URL '{url}' must include http:// or https://"
            )))
        }
    }

    pub fn sync_interval(&self) -> Result<Duration> {
        match self.sync_interval_secs {
            None => Ok(DEFAULT_SYNC_INTERVAL),
            Some(0) => Err(Error::Config(
                "sync interval must be at least one second".to_string(),
            )),
            Some(secs) => Ok(Duration::from_secs(secs)),
        }
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(
            self.remote_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REMOTE_TIMEOUT_SECS),
        )
    }
}

fn parse_seconds(key: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .map_err(|_| Error::Config(format!("{key} must be a whole number of seconds, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect::<HashMap<_, _>>();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let config = QuotebookConfig::default();
        assert_eq!(config.remote_url().unwrap(), DEFAULT_REMOTE_URL);
        assert_eq!(config.sync_interval().unwrap(), Duration::from_secs(60));
        assert_eq!(
            config.remote_timeout(),
            Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS)
        );
    }

    #[test]
    fn env_overrides_file_values() {
        let config = QuotebookConfig {
            remote_url: Some("https://file.example.com/quotes".to_string()),
            sync_interval_secs: Some(300),
            ..Default::default()
        }
        .with_overrides_from(lookup(&[
            (ENV_REMOTE_URL, " https://env.example.com/quotes "),
            (ENV_SYNC_INTERVAL_SECS, "15"),
            (ENV_DATA_DIR, "/tmp/quotebook"),
        ]))
        .unwrap();

        assert_eq!(config.remote_url().unwrap(), "https://env.example.com/quotes");
        assert_eq!(config.sync_interval().unwrap(), Duration::from_secs(15));
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/quotebook")));
    }

    #[test]
    fn env_rejects_non_numeric_interval() {
        let error = QuotebookConfig::default()
            .with_overrides_from(lookup(&[(ENV_SYNC_INTERVAL_SECS, "soon")]))
            .unwrap_err();
        assert!(matches!(error, Error::Config(_)));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = QuotebookConfig {
            sync_interval_secs: Some(0),
            ..Default::default()
        };
        assert!(config.sync_interval().is_err());
    }

    #[test]
    fn remote_url_requires_http_scheme() {
        let config = QuotebookConfig {
            remote_url: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert!(config.remote_url().is_err());
    }

    #[test]
    fn load_from_path_handles_missing_and_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert_eq!(
            QuotebookConfig::load_from_path(&path).unwrap(),
            QuotebookConfig::default()
        );

        std::fs::write(&path, r#"{"remote_url":"https://a.example.com","colour":"red"}"#)
            .unwrap();
        let error = QuotebookConfig::load_from_path(&path).unwrap_err();
        assert!(error.to_string().contains("unknown field"));

        std::fs::write(&path, r#"{"sync_interval_secs": 30}"#).unwrap();
        let config = QuotebookConfig::load_from_path(&path).unwrap();
        assert_eq!(config.sync_interval().unwrap(), Duration::from_secs(30));
    }
}
