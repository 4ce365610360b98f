// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tidelog: structured JSON logging with time-based file rotation
//!
//! ```no_run
//! # async fn run() -> Result<(), tidelog::SetupError> {
//! let logger = tidelog::Logger::configure(None)?;
//! logger.info("service started");
//! logger.in_scope(|| tracing::info!(port = 8080, "listening"));
//! # let _ = logger.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod env;
mod format;
mod logger;
pub mod rotation;

pub use format::{JsonLayer, HOST_KEY, LEVEL_KEY, MESSAGE_KEY, TIME_KEY};
pub use logger::{Logger, LoggerBuilder, SetupError};
pub use rotation::{Rotated, RotationError, RotationHandle, RotationHealth, Rotator};

pub use tidelog_core::{
    Clock, ConfigError, FakeClock, LoggerConfig, RotationMode, RotationSchedule, SystemClock,
};
pub use tidelog_sink::{MemoryBuffer, RotatingFileSink, SinkWriter, Target, TargetKind};
