// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Age-based removal of finished jobs.

use crate::registry::JobRegistry;
use mb_core::JobId;
use std::time::Duration;
use tracing::{debug, info};

/// How long a terminal job is kept before a sweep drops it.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Drops terminal jobs older than `max_age`, measured from completion.
///
/// Live jobs are never touched, no matter how long ago they were created.
#[derive(Debug, Clone, Copy)]
pub struct RetentionSweeper {
    max_age: Duration,
}

impl Default for RetentionSweeper {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE)
    }
}

impl RetentionSweeper {
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    /// Remove expired jobs as of `now_ms` and return their ids.
    pub fn sweep(&self, registry: &JobRegistry, now_ms: u64) -> Vec<JobId> {
        let max_age_ms = u64::try_from(self.max_age.as_millis()).unwrap_or(u64::MAX);
        let cutoff_ms = now_ms.saturating_sub(max_age_ms);
        let removed = registry.remove_where(|job| job.completed_before(cutoff_ms));

        if removed.is_empty() {
            debug!(cutoff_ms, "retention sweep found nothing to remove");
        } else {
            info!(count = removed.len(), cutoff_ms, "swept expired jobs");
        }
        removed
    }
}

#[cfg(test)]
#[path = "retention_tests.rs"]
mod tests;
