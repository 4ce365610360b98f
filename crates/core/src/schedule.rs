// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! When the next rotation is due.

use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Fixed rotation cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationSchedule {
    /// At the next local midnight.
    Daily,
    /// A fixed period after the previous tick.
    Every(Duration),
}

impl RotationSchedule {
    /// Time to wait from `now` until the next tick.
    pub fn delay_from(&self, now: DateTime<Local>) -> Duration {
        match self {
            RotationSchedule::Every(period) => *period,
            RotationSchedule::Daily => until_next_midnight(now),
        }
    }
}

/// Ticks this close before midnight count as already past it. The sleep
/// runs on the monotonic clock and can wake just before the wall-clock
/// boundary.
const MIDNIGHT_SLACK_SECS: i64 = 1;

fn until_next_midnight(now: DateTime<Local>) -> Duration {
    let next = (now + chrono::TimeDelta::seconds(MIDNIGHT_SLACK_SECS))
        .date_naive()
        .succ_opt()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        // DST gaps can skip local midnight; fall back to a full day.
        .and_then(|midnight| Local.from_local_datetime(&midnight).earliest());

    match next {
        Some(next) => (next - now).to_std().unwrap_or(DAY),
        None => DAY,
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
