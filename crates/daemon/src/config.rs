// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default interval between resync passes
pub const DEFAULT_RESYNC_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to read config {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Invalid config {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("resync_interval must be greater than zero")]
    ZeroResyncInterval,
}

/// On-disk shape of `kiln.toml`; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    state_dir: Option<PathBuf>,
    #[serde(with = "humantime_serde", default)]
    resync_interval: Option<Duration>,
    #[serde(with = "humantime_serde", default)]
    build_timeout: Option<Duration>,
}

/// Resolved daemon configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of all daemon state
    pub state_dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Path to the operation WAL
    pub wal_path: PathBuf,
    /// Directory scanned for integration manifests
    pub inbox_path: PathBuf,
    pub resync_interval: Duration,
    /// Running builds older than this are failed; `None` waits forever
    pub build_timeout: Option<Duration>,
}

impl Config {
    /// Defaults rooted at the given state directory
    pub fn with_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Self {
            lock_path: state_dir.join("kilnd.pid"),
            log_path: state_dir.join("kilnd.log"),
            wal_path: state_dir.join("wal").join("operations.wal"),
            inbox_path: state_dir.join("inbox"),
            state_dir,
            resync_interval: DEFAULT_RESYNC_INTERVAL,
            build_timeout: None,
        }
    }

    /// Load configuration, reading `path` if given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::with_state_dir(default_state_dir()?));
        };
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::parse(&content, path)
    }

    /// Parse a `kiln.toml` document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Path::new("kiln.toml"))
    }

    fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(origin.to_path_buf(), e))?;

        let state_dir = match file.state_dir {
            Some(dir) => dir,
            None => default_state_dir()?,
        };
        let mut config = Self::with_state_dir(state_dir);

        if let Some(interval) = file.resync_interval {
            if interval.is_zero() {
                return Err(ConfigError::ZeroResyncInterval);
            }
            config.resync_interval = interval;
        }
        // a zero timeout is the same as none
        config.build_timeout = file.build_timeout.filter(|t| !t.is_zero());

        Ok(config)
    }
}

/// `$XDG_STATE_HOME/kiln`, falling back to the platform state dir
fn default_state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("XDG_STATE_HOME") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir).join("kiln"));
        }
    }
    dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("state")))
        .map(|dir| dir.join("kiln"))
        .ok_or(ConfigError::NoStateDir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
