// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable durations for job messages.

use std::time::Duration;

/// Format a duration as `"45s"`, `"25m"`, `"1m 30s"`, `"2h"`, or `"1h 5m"`.
///
/// Seconds are dropped once the duration reaches an hour.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    match (h, m, s) {
        (0, 0, s) => format!("{}s", s),
        (0, m, 0) => format!("{}m", m),
        (0, m, s) => format!("{}m {}s", m, s),
        (h, 0, _) => format!("{}h", h),
        (h, m, _) => format!("{}h {}m", h, m),
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
