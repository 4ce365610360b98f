// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time-based log rotation.
//!
//! A [`Rotator`] performs one rotation: pick the next file name, open it,
//! exchange it into the sink, delete files that fell out of retention.
//! [`RotationHandle::spawn`] runs it on a fixed schedule as a background
//! tokio task (like the checkpoint and flush tasks of a daemon) until told
//! to stop.
//!
//! A failed rotation never stops the schedule: the previous file stays
//! active, the failure is logged through it and recorded in
//! [`RotationHealth`], and the next tick tries again.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tidelog_core::{naming, Clock, LoggerConfig, RotationMode, RotationSchedule};
use tidelog_sink::{Exchange, RotatingFileSink, Target};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::instrument::WithSubscriber;
use tracing::{debug, info, warn, Dispatch};

/// How long [`RotationHandle::stop`] waits for the task before aborting it.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Rotation errors. All of them leave the previous file active.
#[derive(Debug, Error)]
pub enum RotationError {
    #[error("rotation is disabled for this logger")]
    Disabled,

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to archive active log file as {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Rotation bookkeeping shared with the logger for status queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RotationHealth {
    pub rotations: u64,
    pub failures: u64,
    pub deleted_files: u64,
    pub last_rotated_ms: Option<u64>,
    pub last_error: Option<String>,
}

/// Result of a successful rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotated {
    /// File now receiving writes.
    pub active: PathBuf,
    /// Where the previous file's content now lives.
    pub archived: Option<PathBuf>,
    /// Expired files removed from disk.
    pub deleted: Vec<PathBuf>,
}

/// Performs rotations of one sink according to one configuration.
pub struct Rotator {
    config: LoggerConfig,
    sink: Arc<RotatingFileSink>,
    clock: Arc<dyn Clock>,
    health: Mutex<RotationHealth>,
}

impl Rotator {
    pub fn new(config: LoggerConfig, sink: Arc<RotatingFileSink>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            sink,
            clock,
            health: Mutex::new(RotationHealth::default()),
        }
    }

    pub fn health(&self) -> RotationHealth {
        self.health.lock().clone()
    }

    pub fn schedule(&self) -> RotationSchedule {
        self.config.schedule()
    }

    /// Rotate now. Failures are logged and recorded before being returned.
    pub fn rotate(&self) -> Result<Rotated, RotationError> {
        let result = match self.config.rotation_mode {
            RotationMode::Reopen => self.reopen(),
            RotationMode::Rename => self.rename_and_reopen(),
        };

        match &result {
            Ok(rotated) => {
                {
                    let mut health = self.health.lock();
                    health.rotations += 1;
                    health.deleted_files += rotated.deleted.len() as u64;
                    health.last_rotated_ms = Some(self.clock.epoch_ms());
                    health.last_error = None;
                }
                info!(
                    active = %rotated.active.display(),
                    archived = ?rotated.archived,
                    deleted = rotated.deleted.len(),
                    "log file rotated"
                );
            }
            Err(e) => {
                {
                    let mut health = self.health.lock();
                    health.failures += 1;
                    health.last_error = Some(e.to_string());
                }
                warn!(error = %e, "log rotation failed, keeping current file");
            }
        }
        result
    }

    fn reopen(&self) -> Result<Rotated, RotationError> {
        let active = self.sink.active_path();
        let next = naming::next_rotation_path(&self.config, self.clock.local_now(), active.as_deref());
        let target = Target::open_file(&next).map_err(|source| RotationError::Open {
            path: next.clone(),
            source,
        })?;
        Ok(self.finish(next, self.sink.exchange(target)))
    }

    fn rename_and_reopen(&self) -> Result<Rotated, RotationError> {
        let base = naming::base_path(&self.config);
        let archive = naming::next_rotation_path(&self.config, self.clock.local_now(), None);
        self.sink
            .rename_active(&archive)
            .map_err(|source| RotationError::Archive {
                path: archive.clone(),
                source,
            })?;
        // Writers keep appending to the archive until the exchange below
        let target = Target::open_file(&base).map_err(|source| RotationError::Open {
            path: base.clone(),
            source,
        })?;
        Ok(self.finish(base, self.sink.exchange(target)))
    }

    fn finish(&self, active: PathBuf, exchange: Exchange) -> Rotated {
        if let Some(e) = &exchange.close_error {
            warn!(error = %e, previous = ?exchange.previous, "failed to close previous log file");
        }

        let mut deleted = Vec::new();
        for path in exchange.expired {
            match std::fs::remove_file(&path) {
                Ok(()) => deleted.push(path),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "expired log file already gone");
                }
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "failed to delete expired log file");
                }
            }
        }

        Rotated {
            active,
            archived: exchange.previous,
            deleted,
        }
    }
}

/// Handle to the background rotation task.
///
/// Dropping the handle signals the task to stop without waiting for it.
pub struct RotationHandle {
    rotator: Arc<Rotator>,
    stop: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl RotationHandle {
    /// Spawn the rotation loop on `runtime`. Its own log records go to `dispatch`.
    pub fn spawn(
        rotator: Arc<Rotator>,
        dispatch: Dispatch,
        runtime: &tokio::runtime::Handle,
    ) -> Self {
        let stop = Arc::new(Notify::new());
        let task = runtime.spawn(
            run_schedule(Arc::clone(&rotator), Arc::clone(&stop)).with_subscriber(dispatch),
        );
        Self {
            rotator,
            stop,
            task: Some(task),
        }
    }

    pub fn rotator(&self) -> &Arc<Rotator> {
        &self.rotator
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the loop and wait for it to exit.
    ///
    /// A rotation already in progress completes first. Waits at most
    /// five seconds, then aborts the task.
    pub async fn stop(mut self) {
        self.stop.notify_one();
        let Some(task) = self.task.take() else {
            return;
        };
        let abort = task.abort_handle();
        match tokio::time::timeout(STOP_TIMEOUT, task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "rotation task ended abnormally"),
            Err(_) => {
                warn!("rotation task did not stop in time, aborting");
                abort.abort();
            }
        }
    }
}

impl Drop for RotationHandle {
    fn drop(&mut self) {
        self.stop.notify_one();
    }
}

async fn run_schedule(rotator: Arc<Rotator>, stop: Arc<Notify>) {
    let schedule = rotator.schedule();
    debug!(?schedule, "rotation scheduler started");

    loop {
        let delay = schedule.delay_from(rotator.clock.local_now());
        tokio::select! {
            _ = stop.notified() => break,
            _ = tokio::time::sleep(delay) => {
                // Errors are logged and recorded by rotate()
                let _ = rotator.rotate();
            }
        }
    }

    debug!("rotation scheduler stopped");
}

#[cfg(test)]
#[path = "rotation_tests.rs"]
mod tests;
