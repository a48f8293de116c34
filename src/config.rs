// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the document visit notifier.
//!
//! Two layers: [`ServerConfig`] is read once from the environment at
//! startup, [`NotifyConfig`] is read from a YAML file on every lookup so
//! edits to webhook mappings take effect without a restart.

use crate::error::RelayError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Process-level settings, fixed for the lifetime of the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address (default: 0.0.0.0:5000)
    pub bind_addr: String,

    /// Path of the YAML notification config (default: config.yaml)
    pub config_path: PathBuf,

    /// Interval between rate limiter sweeps in seconds (default: 60)
    pub cleanup_interval_secs: u64,
}

/// Notification settings, re-read from disk per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Document name to webhook URL
    #[serde(default)]
    pub webhooks: HashMap<String, String>,

    /// Fallback webhook for unmapped documents; empty means none
    #[serde(default)]
    pub default_webhook: Option<String>,

    /// Suppress repeat notifications per source and document (default: true)
    #[serde(default = "default_true")]
    pub enable_rate_limit: bool,

    /// Suppression window in seconds (default: 60)
    #[serde(default = "default_rate_limit_seconds")]
    pub rate_limit_seconds: u64,

    /// Extra blocklist substrings, matched case-insensitively
    #[serde(default)]
    pub blocked_paths: Vec<String>,

    /// Only accept names containing at least one CJK ideograph (default: false)
    #[serde(default)]
    pub chinese_only: bool,
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_config_path() -> PathBuf {
    PathBuf::from("config.yaml")
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_rate_limit_seconds() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            config_path: default_config_path(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhooks: HashMap::new(),
            default_webhook: None,
            enable_rate_limit: default_true(),
            rate_limit_seconds: default_rate_limit_seconds(),
            blocked_paths: Vec::new(),
            chinese_only: false,
        }
    }
}

impl ServerConfig {
    /// Load settings from environment variables, falling back to defaults
    /// for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            config_path: std::env::var("CONFIG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.config_path),
            cleanup_interval_secs: std::env::var("CLEANUP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval_secs),
        }
    }

    /// Get the sweep interval
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

impl NotifyConfig {
    /// Parse a YAML config file. Map keys keep their case, so document
    /// names match exactly as written. A blank file yields the defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, RelayError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parse YAML text.
    pub fn from_yaml_str(contents: &str) -> Result<Self, RelayError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Get the suppression window
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_seconds)
    }
}

/// Supplies a fresh [`NotifyConfig`] snapshot for each request.
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> NotifyConfig;
}

/// Reads the YAML file on every call. A missing or broken file yields the
/// defaults and a warning, never an error.
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> NotifyConfig {
        if !self.path.exists() {
            warn!(path = %self.path.display(), "Config file not found, using defaults");
            return NotifyConfig::default();
        }

        match NotifyConfig::from_yaml_file(&self.path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Failed to load config, using defaults");
                NotifyConfig::default()
            }
        }
    }
}

/// Fixed configuration, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigSource(pub NotifyConfig);

impl ConfigSource for StaticConfigSource {
    fn load(&self) -> NotifyConfig {
        self.0.clone()
    }
}
