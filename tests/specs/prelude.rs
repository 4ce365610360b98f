//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};

pub use serde_json::Value;
pub use std::time::Duration;
pub use tidelog::{
    FakeClock, Logger, LoggerConfig, MemoryBuffer, RotationError, RotationMode, SetupError,
    Target, MESSAGE_KEY,
};

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 2000;

/// Poll `condition` until it holds or `timeout_ms` elapses.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

// =============================================================================
// LogDir
// =============================================================================

/// Temporary working directory; loggers write under `<root>/log`.
pub struct LogDir {
    dir: tempfile::TempDir,
}

impl LogDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root().join("log")
    }

    /// File output config with an hourly schedule that never fires in a test.
    pub fn config(&self, file_name: &str, retained: usize) -> LoggerConfig {
        LoggerConfig {
            directory: self.log_dir(),
            file_name: file_name.to_string(),
            retained_file_count: retained,
            rotation_interval_secs: Some(3600),
            ..LoggerConfig::default()
        }
    }

    /// Every file under `<root>/log`, sorted. Empty when it does not exist.
    pub fn files(&self) -> Vec<PathBuf> {
        list(&self.log_dir())
    }

    /// Every entry directly under the root.
    pub fn entries(&self) -> Vec<PathBuf> {
        list(self.root())
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }
}

fn list(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries.map(|e| e.unwrap().path()).collect();
    paths.sort();
    paths
}

// =============================================================================
// Records
// =============================================================================

pub fn parse_records(text: &str) -> Vec<Value> {
    text.lines()
        .map(|line| {
            serde_json::from_str(line).unwrap_or_else(|e| panic!("bad record {line:?}: {e}"))
        })
        .collect()
}

pub fn read_records(path: &Path) -> Vec<Value> {
    parse_records(&std::fs::read_to_string(path).unwrap())
}

pub fn messages(records: &[Value]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r[MESSAGE_KEY].as_str().map(str::to_string))
        .collect()
}

/// Build a logger whose console output is captured in memory.
pub fn console_logger(config: LoggerConfig) -> (Logger, MemoryBuffer) {
    let buffer = MemoryBuffer::new();
    let logger = Logger::builder()
        .config(config)
        .console(Target::memory(buffer.clone()))
        .build()
        .unwrap();
    (logger, buffer)
}
