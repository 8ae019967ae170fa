// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Protocol version (from Cargo.toml)
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

fn var_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|s| s.trim().parse::<u64>().ok())
}

/// Resolve state directory: MB_STATE_DIR > XDG_STATE_HOME/mb > ~/.local/state/mb
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("MB_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("mb"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/mb"))
}

/// Root of per-job output directories (default `<state_dir>/recordings`)
pub fn recordings_dir(state_dir: &Path) -> PathBuf {
    std::env::var("MB_RECORDINGS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir.join("recordings"))
}

/// External recorder program. Unset means the simulated recorder is used.
pub fn recorder_cmd() -> Option<PathBuf> {
    std::env::var("MB_RECORDER_CMD").ok().filter(|s| !s.trim().is_empty()).map(PathBuf::from)
}

/// Delay of the simulated recorder
pub fn simulated_delay() -> Duration {
    Duration::from_millis(var_u64("MB_SIMULATED_DELAY_MS").unwrap_or(2000))
}

/// Extra time past a job's recording budget before it is timed out
pub fn deadline_buffer() -> Duration {
    Duration::from_secs(var_u64("MB_DEADLINE_BUFFER_SECS").unwrap_or(600))
}

/// How long a cancelled recorder gets to exit before it is abandoned
pub fn cancel_grace() -> Duration {
    Duration::from_millis(var_u64("MB_CANCEL_GRACE_MS").unwrap_or(5000))
}

/// Age after which finished jobs are swept
pub fn retention() -> Duration {
    Duration::from_secs(var_u64("MB_RETENTION_HOURS").unwrap_or(24).saturating_mul(60 * 60))
}

/// Periodic sweep interval. Unset (or 0) means sweeps only run before
/// listing jobs and computing stats.
pub fn sweep_interval() -> Option<Duration> {
    var_u64("MB_SWEEP_INTERVAL_SECS").filter(|&secs| secs > 0).map(Duration::from_secs)
}

/// Default IPC timeout
pub fn ipc_timeout() -> Duration {
    var_u64("MB_IPC_TIMEOUT_MS").map(Duration::from_millis).unwrap_or(Duration::from_secs(5))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
