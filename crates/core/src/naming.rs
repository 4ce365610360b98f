// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log file path construction.
//!
//! - Rotation disabled, or `rename` mode: `<directory>/<file_name>.log`
//! - Rotated files: `<directory>/<file_name>_<YYYYmmddHHMMSS>.log`, with a
//!   `-N` suffix when a file with that stamp already exists

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::{LoggerConfig, RotationMode};

pub const LOG_EXTENSION: &str = "log";

/// Second-resolution stamp embedded in rotated file names.
pub const ROTATION_STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Length of a rendered [`ROTATION_STAMP_FORMAT`] stamp.
const STAMP_LEN: usize = 14;

/// The un-stamped file path.
pub fn base_path(config: &LoggerConfig) -> PathBuf {
    config
        .directory
        .join(format!("{}.{LOG_EXTENSION}", config.file_name))
}

pub fn stamped_path(config: &LoggerConfig, at: DateTime<Local>) -> PathBuf {
    config.directory.join(format!(
        "{}_{}.{LOG_EXTENSION}",
        config.file_name,
        at.format(ROTATION_STAMP_FORMAT)
    ))
}

/// Path of the first file a logger opens.
///
/// Reopening an existing path appends to it.
pub fn initial_path(config: &LoggerConfig, at: DateTime<Local>) -> PathBuf {
    if config.rotation_enabled() && config.rotation_mode == RotationMode::Reopen {
        stamped_path(config, at)
    } else {
        base_path(config)
    }
}

/// Path for a rotation happening at `at`, distinct from `active` and from
/// every file already on disk.
pub fn next_rotation_path(
    config: &LoggerConfig,
    at: DateTime<Local>,
    active: Option<&Path>,
) -> PathBuf {
    let stamp = at.format(ROTATION_STAMP_FORMAT).to_string();
    let taken = |path: &Path| active == Some(path) || path.exists();

    let mut candidate = stamped_path(config, at);
    let mut n = 1u32;
    while taken(&candidate) {
        candidate = config.directory.join(format!(
            "{}_{stamp}-{n}.{LOG_EXTENSION}",
            config.file_name
        ));
        n += 1;
    }
    candidate
}

/// Whether `path` is a log file belonging to `config` (active or rotated).
pub fn is_log_file(config: &LoggerConfig, path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let Some(stem) = name.strip_suffix(&format!(".{LOG_EXTENSION}")) else {
        return false;
    };
    stem == config.file_name
        || stem
            .strip_prefix(&config.file_name)
            .and_then(|rest| rest.strip_prefix('_'))
            .is_some_and(is_rotation_suffix)
}

/// `<YYYYmmddHHMMSS>` or `<YYYYmmddHHMMSS>-<N>`.
fn is_rotation_suffix(suffix: &str) -> bool {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let (stamp, counter) = match suffix.split_once('-') {
        Some((stamp, n)) => (stamp, Some(n)),
        None => (suffix, None),
    };
    stamp.len() == STAMP_LEN && all_digits(stamp) && counter.is_none_or(all_digits)
}

/// Rotated files of `config` already on disk, oldest first, excluding `active`.
///
/// Stamps sort lexically in time order; `-N` collision suffixes sort after
/// the plain stamp.
pub fn existing_rotated_files(config: &LoggerConfig, active: Option<&Path>) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(&config.directory) else {
        return Vec::new();
    };
    let base = base_path(config);
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_log_file(config, path))
        .filter(|path| *path != base && Some(path.as_path()) != active)
        .collect();
    files.sort_by_key(|path| rotation_order_key(path));
    files
}

fn rotation_order_key(path: &Path) -> (String, u32) {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    match stem.rsplit_once('-') {
        Some((stamp, n)) => match n.parse() {
            Ok(n) => (stamp.to_string(), n),
            Err(_) => (stem.to_string(), 0),
        },
        None => (stem.to_string(), 0),
    }
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;
