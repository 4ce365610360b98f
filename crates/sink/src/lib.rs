// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tidelog-sink: a log sink whose output file can be swapped while
//! writers keep writing

mod sink;
mod target;
mod writer;

pub use sink::{Exchange, RotatingFileSink};
pub use target::{LogFile, MemoryBuffer, Target, TargetKind};
pub use writer::SinkWriter;
