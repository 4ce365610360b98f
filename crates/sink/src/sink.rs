// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The rotating sink: one active target, swapped atomically with respect
//! to writes.
//!
//! Every write and every exchange takes the same mutex, held for exactly one
//! of them. A record passed to [`RotatingFileSink::write`] therefore lands
//! entirely in the target that was active when the lock was acquired.
//!
//! Nothing here emits `tracing` events: the sink is usually the destination
//! of those events, and the mutex is not reentrant. Failures are returned to
//! the caller to report once the lock is released.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::target::{Target, TargetKind};

/// Outcome of swapping the active target.
#[derive(Debug)]
pub struct Exchange {
    /// Path of the target that was replaced, if it was a file.
    pub previous: Option<PathBuf>,
    /// Files dropped from history that should be deleted from disk, oldest first.
    pub expired: Vec<PathBuf>,
    /// Error from closing the previous target. The swap happened regardless.
    pub close_error: Option<io::Error>,
}

struct SinkState {
    active: Target,
    /// Previously active files, oldest first. Never written to again.
    history: VecDeque<PathBuf>,
}

/// Thread-safe writer whose underlying target can be exchanged at runtime.
pub struct RotatingFileSink {
    state: Mutex<SinkState>,
    /// Rotated files kept in history; 0 keeps all of them.
    retained_file_count: usize,
}

impl RotatingFileSink {
    pub fn new(active: Target, retained_file_count: usize) -> Self {
        Self::with_history(active, retained_file_count, Vec::new())
    }

    /// Create a sink that already knows about rotated files from an earlier
    /// run, so they count toward retention.
    pub fn with_history(
        active: Target,
        retained_file_count: usize,
        history: impl IntoIterator<Item = PathBuf>,
    ) -> Self {
        Self {
            state: Mutex::new(SinkState {
                active,
                history: history.into_iter().collect(),
            }),
            retained_file_count,
        }
    }

    /// Write `buf` to the active target in full.
    pub fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        state.active.write_record(buf)?;
        Ok(buf.len())
    }

    pub fn flush(&self) -> io::Result<()> {
        self.state.lock().active.flush()
    }

    /// Install `next` as the active target and close the previous one.
    ///
    /// The previous file joins the history; history beyond the retention
    /// count is returned in [`Exchange::expired`].
    pub fn exchange(&self, next: Target) -> Exchange {
        let (previous, expired) = {
            let mut state = self.state.lock();
            let previous = std::mem::replace(&mut state.active, next);
            let expired = match previous.path() {
                Some(path) => {
                    state.history.push_back(path.to_path_buf());
                    self.trim_history(&mut state.history)
                }
                None => Vec::new(),
            };
            (previous, expired)
        };

        // The previous target is out of reach of writers; close it unlocked.
        let path = previous.path().map(Path::to_path_buf);
        let close_error = previous.close().err();

        Exchange {
            previous: path,
            expired,
            close_error,
        }
    }

    fn trim_history(&self, history: &mut VecDeque<PathBuf>) -> Vec<PathBuf> {
        if self.retained_file_count == 0 {
            return Vec::new();
        }
        let excess = history.len().saturating_sub(self.retained_file_count);
        history.drain(..excess).collect()
    }

    /// Rename the active file on disk without interrupting writes.
    ///
    /// Returns the path it was renamed from.
    pub fn rename_active(&self, to: &Path) -> io::Result<PathBuf> {
        let mut state = self.state.lock();
        match state.active.file_mut() {
            Some(file) => file.rename(to),
            None => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "active log target is not a file",
            )),
        }
    }

    pub fn active_path(&self) -> Option<PathBuf> {
        self.state.lock().active.path().map(Path::to_path_buf)
    }

    pub fn active_kind(&self) -> TargetKind {
        self.state.lock().active.kind()
    }

    /// Rotated files still on disk, oldest first.
    pub fn history(&self) -> Vec<PathBuf> {
        self.state.lock().history.iter().cloned().collect()
    }

    pub fn retained_file_count(&self) -> usize {
        self.retained_file_count
    }
}

impl std::fmt::Debug for RotatingFileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RotatingFileSink")
            .field("active", &state.active)
            .field("history", &state.history)
            .field("retained_file_count", &self.retained_file_count)
            .finish()
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
