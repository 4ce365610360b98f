// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized process-environment access for the logger crate.

use std::path::PathBuf;

use tidelog_core::LoggerConfig;

/// Level filter override, in `EnvFilter` directive syntax.
pub const LEVEL_VAR: &str = "TIDELOG_LOG";

/// Log directory override.
pub const DIR_VAR: &str = "TIDELOG_DIR";

pub fn level_override() -> Option<String> {
    std::env::var(LEVEL_VAR).ok().filter(|s| !s.trim().is_empty())
}

pub fn directory_override() -> Option<PathBuf> {
    std::env::var_os(DIR_VAR)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Apply `TIDELOG_LOG` / `TIDELOG_DIR` on top of `config`.
pub fn apply_overrides(mut config: LoggerConfig) -> LoggerConfig {
    if let Some(level) = level_override() {
        config.level = level;
    }
    if let Some(dir) = directory_override() {
        config.directory = dir;
    }
    config
}

/// The host's network name, or `None` when it is empty or not valid UTF-8.
pub fn host_name() -> Option<String> {
    let name = gethostname::gethostname().into_string().ok()?;
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
