// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The logger facade.
//!
//! A [`Logger`] is built once by the process entry point and handed to
//! whatever needs to log. It owns the sink, the `tracing` dispatcher that
//! renders into it and, when rotation is enabled, the background rotation
//! task. Nothing is installed globally unless [`Logger::install_global`] is
//! called.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tidelog_core::{naming, Clock, ConfigError, LoggerConfig, SystemClock};
use tidelog_sink::{RotatingFileSink, SinkWriter, Target};
use tracing::instrument::WithSubscriber;
use tracing::{debug, error, info, warn, Dispatch};
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use crate::env;
use crate::format::{JsonLayer, HOST_KEY};
use crate::rotation::{Rotated, RotationError, RotationHandle, RotationHealth, Rotator};

/// Errors that prevent a logger from being created.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid level directive '{directive}': {source}")]
    Filter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("log rotation requires a running tokio runtime")]
    NoRuntime,

    #[error("failed to install global logger: {0}")]
    GlobalDefault(#[from] tracing::dispatcher::SetGlobalDefaultError),
}

/// Builder for a [`Logger`] with injected collaborators.
///
/// Unlike [`Logger::configure`], the builder does not read the process
/// environment.
pub struct LoggerBuilder {
    config: LoggerConfig,
    console: Option<Target>,
    clock: Arc<dyn Clock>,
}

impl LoggerBuilder {
    fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            console: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Destination used when `write_to_file` is false. Defaults to stdout.
    pub fn console(mut self, target: Target) -> Self {
        self.console = Some(target);
        self
    }

    pub fn clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn build(self) -> Result<Logger, SetupError> {
        let LoggerBuilder {
            config,
            console,
            clock,
        } = self;
        config.validate()?;

        let filter = EnvFilter::try_new(&config.level).map_err(|source| SetupError::Filter {
            directive: config.level.clone(),
            source,
        })?;

        let runtime = if config.rotation_enabled() {
            Some(tokio::runtime::Handle::try_current().map_err(|_| SetupError::NoRuntime)?)
        } else {
            None
        };

        let sink = Arc::new(open_sink(&config, console, clock.as_ref())?);
        let host = if config.tag_host {
            env::host_name()
        } else {
            None
        };

        let writer = SinkWriter::new(Arc::clone(&sink));
        let (dispatch, writer_guard) = if config.non_blocking {
            // Lossless: writers block when the queue is full instead of dropping records
            let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(writer);
            (json_dispatch(writer, &config, host.as_deref(), filter), Some(guard))
        } else {
            (json_dispatch(writer, &config, host.as_deref(), filter), None)
        };

        let rotation = runtime.map(|runtime| {
            let rotator = Arc::new(Rotator::new(config.clone(), Arc::clone(&sink), clock));
            RotationHandle::spawn(rotator, dispatch.clone(), &runtime)
        });

        let logger = Logger {
            config,
            dispatch,
            sink,
            host,
            rotation,
            writer_guard: Mutex::new(writer_guard),
        };
        logger.in_scope(|| {
            info!(
                output = %logger.output_description(),
                rotation = logger.rotation.is_some(),
                "logger configured"
            )
        });
        Ok(logger)
    }
}

fn open_sink(
    config: &LoggerConfig,
    console: Option<Target>,
    clock: &dyn Clock,
) -> Result<RotatingFileSink, SetupError> {
    if !config.write_to_file {
        let target = console.unwrap_or_else(Target::stdout);
        return Ok(RotatingFileSink::new(target, config.retained_file_count));
    }

    std::fs::create_dir_all(&config.directory).map_err(|source| SetupError::CreateDir {
        path: config.directory.clone(),
        source,
    })?;

    let path = naming::initial_path(config, clock.local_now());
    let target = Target::open_file(&path).map_err(|source| SetupError::OpenFile {
        path: path.clone(),
        source,
    })?;

    // Rotated files from earlier runs count toward retention
    let history = if config.rotation_enabled() {
        naming::existing_rotated_files(config, Some(&path))
    } else {
        Vec::new()
    };
    Ok(RotatingFileSink::with_history(
        target,
        config.retained_file_count,
        history,
    ))
}

fn json_dispatch<W>(
    writer: W,
    config: &LoggerConfig,
    host: Option<&str>,
    filter: EnvFilter,
) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let mut layer = JsonLayer::new(writer, config.timestamp_format.clone());
    if let Some(host) = host {
        layer = layer.with_static_field(HOST_KEY, host);
    }
    Dispatch::new(tracing_subscriber::registry().with(filter).with(layer))
}

/// Structured JSON logger writing to stdout or to rotated files.
pub struct Logger {
    config: LoggerConfig,
    dispatch: Dispatch,
    sink: Arc<RotatingFileSink>,
    host: Option<String>,
    rotation: Option<RotationHandle>,
    writer_guard: Mutex<Option<WorkerGuard>>,
}

impl Logger {
    /// Create a logger from `config`, or from the defaults when `None`.
    ///
    /// `TIDELOG_LOG` and `TIDELOG_DIR` override the level and directory.
    /// Must be called inside a tokio runtime when rotation is enabled. The
    /// default configuration rotates, so `configure(None)` outside a runtime
    /// fails with [`SetupError::NoRuntime`].
    pub fn configure(config: Option<LoggerConfig>) -> Result<Logger, SetupError> {
        let config = env::apply_overrides(config.unwrap_or_default());
        Self::builder().config(config).build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.in_scope(|| debug!("{message}"));
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.in_scope(|| info!("{message}"));
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.in_scope(|| warn!("{message}"));
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.in_scope(|| error!("{message}"));
    }

    /// Log at error level with `fatal = true`, flush, and exit with status 1.
    pub fn fatal(&self, message: impl fmt::Display) -> ! {
        self.in_scope(|| error!(fatal = true, "{message}"));
        drop(self.writer_guard.lock().take());
        if let Err(e) = self.sink.flush() {
            eprintln!("tidelog: failed to flush log before exit: {e}");
        }
        std::process::exit(1)
    }

    /// Run `f` with this logger as the current `tracing` dispatcher.
    ///
    /// Inside `f`, the regular `tracing` macros (with fields and spans)
    /// write through this logger.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// The dispatcher, for `WithSubscriber::with_subscriber` on futures.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Make this logger the process-wide default. Can succeed only once
    /// per process.
    pub fn install_global(&self) -> Result<(), SetupError> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())?;
        Ok(())
    }

    pub fn flush(&self) -> io::Result<()> {
        self.sink.flush()
    }

    pub fn sink(&self) -> &Arc<RotatingFileSink> {
        &self.sink
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Rotation counters, or `None` when rotation is disabled.
    pub fn rotation_health(&self) -> Option<RotationHealth> {
        self.rotation.as_ref().map(|r| r.rotator().health())
    }

    /// Rotate immediately, outside the schedule.
    pub fn rotate_now(&self) -> Result<Rotated, RotationError> {
        let rotation = self.rotation.as_ref().ok_or(RotationError::Disabled)?;
        self.in_scope(|| rotation.rotator().rotate())
    }

    /// Stop the rotation task, drain any background writer and flush.
    pub async fn shutdown(self) -> io::Result<()> {
        let Logger {
            dispatch,
            sink,
            rotation,
            writer_guard,
            ..
        } = self;

        if let Some(rotation) = rotation {
            rotation.stop().with_subscriber(dispatch.clone()).await;
        }
        tracing::dispatcher::with_default(&dispatch, || debug!("logger shut down"));

        // Dropping the guard blocks until queued records reach the sink
        drop(writer_guard.into_inner());
        sink.flush()
    }

    fn output_description(&self) -> String {
        match self.sink.active_path() {
            Some(path) => path.display().to_string(),
            None => format!("{:?}", self.sink.active_kind()).to_lowercase(),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config)
            .field("host", &self.host)
            .field("sink", &self.sink)
            .field("rotating", &self.rotation.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
