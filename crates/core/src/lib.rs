// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tidelog-core: configuration, clock and file naming shared by the tidelog crates

pub mod clock;
pub mod config;
pub mod naming;
pub mod schedule;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, LoggerConfig, RotationMode, DEFAULT_TIMESTAMP_FORMAT};
pub use schedule::RotationSchedule;
