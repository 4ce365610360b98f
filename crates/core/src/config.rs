// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logger configuration.
//!
//! A [`LoggerConfig`] is built once at startup (from defaults, TOML, or
//! code) and never mutated after the logger is created.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schedule::RotationSchedule;

/// Default record timestamp layout (RFC 3339 with milliseconds).
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("file_name must not be empty")]
    EmptyFileName,

    #[error("file_name '{0}' must not contain path separators")]
    InvalidFileName(String),

    #[error("rotation_interval_secs must be greater than zero")]
    ZeroInterval,

    #[error("invalid timestamp_format '{0}'")]
    InvalidTimestampFormat(String),
}

/// How a rotation produces the next active file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationMode {
    /// Open a fresh timestamped file each period; the previous file keeps its name.
    #[default]
    Reopen,
    /// Keep writing to `<file_name>.log`; on rotation rename it to a
    /// timestamped archive and reopen the base name.
    Rename,
}

/// Logger configuration: output location, rotation policy, record layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Directory log files are written to (created if missing).
    pub directory: PathBuf,

    /// Write to files under `directory`; when false, records go to stdout.
    pub write_to_file: bool,

    /// Base file name, without extension.
    pub file_name: String,

    /// strftime layout for the `time` field of each record.
    pub timestamp_format: String,

    /// Rotated files kept on disk besides the active one. 0 disables rotation.
    pub retained_file_count: usize,

    /// Rotate every N seconds instead of daily at local midnight.
    pub rotation_interval_secs: Option<u64>,

    pub rotation_mode: RotationMode,

    /// Attach a `host` field to every record.
    pub tag_host: bool,

    /// `EnvFilter` directive, e.g. `"info"` or `"info,my_crate=debug"`.
    pub level: String,

    /// Hand records to a background writer thread instead of writing inline.
    pub non_blocking: bool,
}

impl Default for LoggerConfig {
    /// File output under `log/application_<timestamp>.log`, rotated daily,
    /// keeping three previous files.
    fn default() -> Self {
        Self {
            directory: PathBuf::from("log"),
            write_to_file: true,
            file_name: "application".to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            retained_file_count: 3,
            rotation_interval_secs: None,
            rotation_mode: RotationMode::Reopen,
            tag_host: true,
            level: "info".to_string(),
            non_blocking: false,
        }
    }
}

impl LoggerConfig {
    /// Configuration that logs to stdout only.
    pub fn stdout() -> Self {
        Self {
            write_to_file: false,
            retained_file_count: 0,
            ..Self::default()
        }
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file_name.trim().is_empty() {
            return Err(ConfigError::EmptyFileName);
        }
        if self.file_name.contains(['/', '\\']) {
            return Err(ConfigError::InvalidFileName(self.file_name.clone()));
        }
        if self.rotation_interval_secs == Some(0) {
            return Err(ConfigError::ZeroInterval);
        }
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidTimestampFormat(
                self.timestamp_format.clone(),
            ));
        }
        Ok(())
    }

    /// Rotation only applies to file output with a non-zero retention count.
    pub fn rotation_enabled(&self) -> bool {
        self.write_to_file && self.retained_file_count > 0
    }

    pub fn schedule(&self) -> RotationSchedule {
        match self.rotation_interval_secs {
            Some(secs) => RotationSchedule::Every(Duration::from_secs(secs)),
            None => RotationSchedule::Daily,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
