//! Configuration management.
//!
//! Values come from the TOML config file, then CLI flags (which also read
//! the environment) override them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use dnsprop::{geo, DnspropError};
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Default request deadline and per-query timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Default cache expiry and cache TTL cap
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

/// Default cache capacity
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 5000;

/// Default ceiling on servers per lookup
pub const DEFAULT_MAX_SERVERS: usize = 50;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolvers asked when a command names none.
    pub resolvers: Vec<String>,

    /// Request deadline, also used as the per-query timeout.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Set the DNSSEC OK bit on queries.
    pub enable_dnssec: bool,

    /// Cache expiry; also caps how long a cached answer is served.
    #[serde(with = "humantime_serde")]
    pub cache_ttl: Duration,

    /// Maximum number of cached results.
    pub cache_max_entries: u64,

    /// Maximum number of servers per lookup.
    pub max_servers: usize,

    /// Log level when neither --verbose nor RUST_LOG is given.
    pub log_level: String,

    /// Default output format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,

    /// Always show explanations (as if --explain was passed).
    pub explain_by_default: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolvers: geo::default_resolvers(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            enable_dnssec: false,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            max_servers: DEFAULT_MAX_SERVERS,
            log_level: "warn".to_string(),
            output_format: None,
            explain_by_default: false,
        }
    }
}

impl Config {
    /// Get the default config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("io", "dnsprop", "dnsprop")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from `path`, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Reject settings the resolver engine cannot work with.
    pub fn validate(&self) -> dnsprop::Result<()> {
        if self.resolvers.iter().all(|r| r.trim().is_empty()) {
            return Err(DnspropError::Config("resolvers must not be empty".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(DnspropError::Config("request_timeout must be > 0".into()));
        }
        if self.cache_ttl.is_zero() {
            return Err(DnspropError::Config("cache_ttl must be > 0".into()));
        }
        if self.cache_max_entries == 0 {
            return Err(DnspropError::Config("cache_max_entries must be > 0".into()));
        }
        if self.max_servers == 0 {
            return Err(DnspropError::Config("max_servers must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.resolvers.len(), 30);
        assert_eq!(config.resolvers[0], "1.1.1.1");
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert_eq!(config.cache_ttl, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_values() {
        let mut config = Config {
            resolvers: vec![" ".into()],
            ..Config::default()
        };
        assert!(config.validate().is_err());

        config = Config {
            request_timeout: Duration::ZERO,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        config = Config {
            cache_max_entries: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(DnspropError::Config(_))));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            resolvers = ["9.9.9.9"]
            request_timeout = "1500ms"
            "#,
        )
        .unwrap();
        assert_eq!(config.resolvers, vec!["9.9.9.9"]);
        assert_eq!(config.request_timeout, Duration::from_millis(1500));
        assert_eq!(config.cache_max_entries, DEFAULT_CACHE_MAX_ENTRIES);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            enable_dnssec: true,
            output_format: Some(OutputFormat::Json),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
