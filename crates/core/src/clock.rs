// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock abstraction used for rotation naming and scheduling.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local, TimeZone};
use parking_lot::Mutex;

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync + 'static {
    /// Milliseconds since the Unix epoch.
    fn epoch_ms(&self) -> u64;

    /// Current time in the local timezone.
    fn local_now(&self) -> DateTime<Local> {
        let ms = i64::try_from(self.epoch_ms()).unwrap_or(i64::MAX);
        Local
            .timestamp_millis_opt(ms)
            .earliest()
            .unwrap_or_else(Local::now)
    }
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn local_now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Manually driven clock for tests.
///
/// Clones share the same underlying time.
#[derive(Debug, Clone)]
pub struct FakeClock {
    epoch_ms: Arc<Mutex<u64>>,
}

impl FakeClock {
    /// Starts at 2023-11-14T22:13:20Z.
    pub fn new() -> Self {
        Self {
            epoch_ms: Arc::new(Mutex::new(1_700_000_000_000)),
        }
    }

    pub fn set_epoch_ms(&self, ms: u64) {
        *self.epoch_ms.lock() = ms;
    }

    pub fn advance(&self, by: Duration) {
        *self.epoch_ms.lock() += by.as_millis() as u64;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn epoch_ms(&self) -> u64 {
        *self.epoch_ms.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
