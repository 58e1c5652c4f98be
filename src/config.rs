//! Client configuration
//!
//! Configuration comes from code, a YAML file, or the environment:
//!
//! | Environment variable                  | Field                    | Default                 |
//! |---------------------------------------|--------------------------|-------------------------|
//! | `SHUTTERLINK_BACKEND_URL`             | `base_url`               | `http://localhost:8000` |
//! | `SHUTTERLINK_POLL_INTERVAL_MS`        | `poll_interval`          | 1000 ms                 |
//! | `SHUTTERLINK_REQUEST_TIMEOUT_MS`      | `request_timeout`        | 10000 ms                |
//! | `SHUTTERLINK_POLL_FAILURE_THRESHOLD`  | `poll_failure_threshold` | 3                       |
//!
//! An empty variable counts as unset.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{RemoteError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_FAILURE_THRESHOLD: u32 = 3;

pub const ENV_BACKEND_URL: &str = "SHUTTERLINK_BACKEND_URL";
pub const ENV_POLL_INTERVAL_MS: &str = "SHUTTERLINK_POLL_INTERVAL_MS";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "SHUTTERLINK_REQUEST_TIMEOUT_MS";
pub const ENV_POLL_FAILURE_THRESHOLD: &str = "SHUTTERLINK_POLL_FAILURE_THRESHOLD";

/// Settings for talking to one camera backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Backend origin, optionally with a path prefix.
    pub base_url: String,
    /// Period between status polls while shooting.
    pub poll_interval: Duration,
    /// Upper bound on a single HTTP request.
    pub request_timeout: Duration,
    /// Consecutive poll failures before polling is reported as degraded.
    pub poll_failure_threshold: u32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_failure_threshold: DEFAULT_POLL_FAILURE_THRESHOLD,
        }
    }
}

/// On-disk form. Durations are plain milliseconds.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    poll_interval_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    poll_failure_threshold: Option<u32>,
}

impl RemoteConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let file = ConfigFile {
            base_url: get(ENV_BACKEND_URL),
            poll_interval_ms: get(ENV_POLL_INTERVAL_MS).map(|v| parse_number(ENV_POLL_INTERVAL_MS, &v)).transpose()?,
            request_timeout_ms: get(ENV_REQUEST_TIMEOUT_MS)
                .map(|v| parse_number(ENV_REQUEST_TIMEOUT_MS, &v))
                .transpose()?,
            poll_failure_threshold: get(ENV_POLL_FAILURE_THRESHOLD)
                .map(|v| parse_number(ENV_POLL_FAILURE_THRESHOLD, &v))
                .transpose()?,
        };
        file.into_config()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml_ng::from_str(yaml)?;
        file.into_config()
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| RemoteError::config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_yaml_str(&yaml)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| RemoteError::config(format!("invalid backend URL '{}': {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RemoteError::config(format!("unsupported URL scheme '{}'", url.scheme())));
        }
        if self.poll_interval.is_zero() {
            return Err(RemoteError::config("poll interval must be above zero"));
        }
        if self.request_timeout.is_zero() {
            return Err(RemoteError::config("request timeout must be above zero"));
        }
        if self.poll_failure_threshold == 0 {
            return Err(RemoteError::config("poll failure threshold must be at least 1"));
        }
        Ok(())
    }
}

impl ConfigFile {
    fn into_config(self) -> Result<RemoteConfig> {
        let defaults = RemoteConfig::default();
        let config = RemoteConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            poll_interval: self.poll_interval_ms.map(Duration::from_millis).unwrap_or(defaults.poll_interval),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis).unwrap_or(defaults.request_timeout),
            poll_failure_threshold: self.poll_failure_threshold.unwrap_or(defaults.poll_failure_threshold),
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| RemoteError::config(format!("{key} must be a whole number, got '{value}'")))
}
