//! Configuration management for rxlookup

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// RxNav REST base URL
pub const DEFAULT_BASE_URL: &str = "https://rxnav.nlm.nih.gov/REST";

/// Environment variable overriding the upstream base URL
pub const BASE_URL_ENV: &str = "RXLOOKUP_BASE_URL";

/// Longest accepted cache entry lifetime (10 years)
pub const MAX_CACHE_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Terminology service base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Outbound request pacing (RxNav allows 20 requests/sec per client)
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Response cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Rule used by `validate`
    #[serde(default)]
    pub validation: ValidationRule,
}

/// Response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub backend: CacheBackend,

    /// Entry lifetime in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

/// Where cached lookups live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// SQLite database under the user cache directory
    #[default]
    Sqlite,
    /// Process-local map, gone when the process exits
    Memory,
}

/// How an RXCUI is judged valid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationRule {
    /// `status.json` reports Active or Remapped
    #[default]
    Status,
    /// `properties.json` reports suppress = N
    Suppress,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_requests_per_second() -> u32 {
    20
}

fn default_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_true() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: CacheBackend::default(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            requests_per_second: default_requests_per_second(),
            cache: CacheConfig::default(),
            validation: ValidationRule::default(),
        }
    }
}

impl Config {
    /// Get the default config file path (~/.rxlookup/config.yaml)
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".rxlookup").join("config.yaml"))
    }

    /// Resolve an optional override to a concrete path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration, falling back to defaults when no file exists.
    ///
    /// An explicit `path` that does not exist is an error; the default location
    /// is optional.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        let resolved = Self::resolve_path(path)?;
        let mut config = if resolved.exists() {
            Self::load_from(&resolved)?
        } else if path.is_some() {
            return Err(ConfigError::NotFound(resolved.display().to_string()).into());
        } else {
            log::debug!("No config at {}, using defaults", resolved.display());
            Self::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BASE_URL_ENV)
            && !url.trim().is_empty()
        {
            self.base_url = url;
        }
    }

    /// Reject settings the client cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".to_string()).into());
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".to_string()).into());
        }
        if self.cache.ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "cache.ttl_secs must be at most {}",
                MAX_CACHE_TTL_SECS
            ))
            .into());
        }
        if self.requests_per_second == 0 {
            return Err(
                ConfigError::Invalid("requests_per_second must be positive".to_string()).into(),
            );
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }
}
