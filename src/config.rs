//! Grouping defaults: salary limit, target leader count, and server bind address.
//!
//! Resolution order: built-in defaults, then `paygroups.yaml` (or an explicit
//! file), then `PAYGROUPS_*` environment variables. CLI flags are applied on
//! top by the caller.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "paygroups.yaml";
pub const DEFAULT_LIMIT: u64 = 48_500;
pub const DEFAULT_LEADER_COUNT: usize = 15;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

pub const ENV_LIMIT: &str = "PAYGROUPS_LIMIT";
pub const ENV_LEADER_COUNT: &str = "PAYGROUPS_LEADER_COUNT";
pub const ENV_BIND: &str = "PAYGROUPS_BIND";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Maximum total salary of any one group.
    pub limit: u64,
    /// Number of leaders (and therefore groups) a caller must supply.
    pub leader_count: usize,
    pub bind_addr: String,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            leader_count: DEFAULT_LEADER_COUNT,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid {name} '{value}' in environment")]
    Env { name: &'static str, value: String },
    #[error("limit must be greater than zero")]
    ZeroLimit,
    #[error("leader count must be greater than zero")]
    ZeroLeaderCount,
}

impl GroupingConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_PATH`] when it exists, then
    /// apply environment overrides. An explicit path that cannot be read is an error.
    ///
    /// Values are not validated here; callers layer their own overrides first
    /// and then call [`GroupingConfig::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Override fields from `lookup`, keyed by the `PAYGROUPS_*` variable names.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_LIMIT) {
            self.limit = value.trim().parse().map_err(|_| ConfigError::Env {
                name: ENV_LIMIT,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(ENV_LEADER_COUNT) {
            self.leader_count = value.trim().parse().map_err(|_| ConfigError::Env {
                name: ENV_LEADER_COUNT,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(ENV_BIND) {
            let value = value.trim();
            if !value.is_empty() {
                self.bind_addr = value.to_string();
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        if self.leader_count == 0 {
            return Err(ConfigError::ZeroLeaderCount);
        }
        Ok(())
    }
}
