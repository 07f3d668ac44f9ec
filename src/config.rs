//! Client configuration
//!
//! Settings are read from a YAML (or JSON) file and then overridden by
//! environment variables.
//!
//! Lookup order when no path is given:
//! 1. `./.flowctl/config.yaml`
//! 2. `$HOME/.flowctl/config.yaml`
//! 3. built-in defaults

use crate::auth::CREDENTIALS_DIR;
use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default API endpoint
pub const DEFAULT_API_URL: &str = "https://api.flowctl.dev";

/// Config file name inside the `.flowctl` directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Effective client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the API
    pub api_url: String,
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,
    /// Network retry budget
    pub retries: u32,
    /// Delay between network retries in milliseconds
    pub retry_delay_ms: u64,
    /// TTL for cached lookups in seconds
    pub cache_ttl_secs: u64,
    /// Project used when a command does not name one
    pub default_project: Option<String>,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: 30_000,
            retries: 0,
            retry_delay_ms: 1_000,
            cache_ttl_secs: 300,
            default_project: None,
            user_agent: format!("flowctl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Parse a config document (YAML, which also covers JSON)
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Read a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load configuration from `path`, or from the default locations
    ///
    /// An explicit path must exist. Environment overrides are applied and
    /// the result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().ok();
        let home = std::env::var_os("HOME").map(PathBuf::from);
        Self::load_from(path, cwd.as_deref(), home.as_deref(), |key| {
            std::env::var(key).ok()
        })
    }

    /// [`Config::load`] with explicit directories and env lookup
    pub fn load_from(
        path: Option<&Path>,
        cwd: Option<&Path>,
        home: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::discover(cwd, home) {
                Some(found) => {
                    debug!(path = %found.display(), "Using config file");
                    Self::from_file(found)?
                }
                None => Self::default(),
            },
        };

        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// First existing config file among the default locations
    pub fn discover(cwd: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
        [cwd, home]
            .into_iter()
            .flatten()
            .map(|dir| dir.join(CREDENTIALS_DIR).join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Override fields from `FLOWCTL_*` environment variables
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("FLOWCTL_API_URL") {
            self.api_url = url;
        }
        if let Some(v) = get("FLOWCTL_TIMEOUT_MS") {
            self.timeout_ms = parse_env("FLOWCTL_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = get("FLOWCTL_RETRIES") {
            self.retries = parse_env("FLOWCTL_RETRIES", &v)?;
        }
        if let Some(v) = get("FLOWCTL_RETRY_DELAY_MS") {
            self.retry_delay_ms = parse_env("FLOWCTL_RETRY_DELAY_MS", &v)?;
        }
        if let Some(project) = get("FLOWCTL_PROJECT") {
            self.default_project = Some(project);
        }
        Ok(())
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(Error::missing_field("api_url"));
        }
        let url = url::Url::parse(&self.api_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "api_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout_ms == 0 {
            return Err(Error::config("timeout_ms must be greater than 0"));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("{key} has an invalid value: '{value}'")))
}
