// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup: directories, socket, and the job service.

use std::time::Instant;

use mb_core::SystemClock;
use mb_engine::{ExecutionSupervisor, JobRegistry, JobService, RetentionSweeper};
use tokio::net::{UnixListener, UnixStream};
use tracing::info;

use super::{Config, DaemonState, LifecycleError, StartupResult};

/// Start the daemon: create directories, bind the socket, build the service.
///
/// A stale socket file left by a crashed daemon is removed; a socket that
/// still accepts connections means another daemon owns it.
pub async fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;
    std::fs::create_dir_all(&config.recordings_dir)?;

    if config.socket_path.exists() {
        if UnixStream::connect(&config.socket_path).await.is_ok() {
            return Err(LifecycleError::AlreadyRunning(config.socket_path.clone()));
        }
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    let recorder = config.recorder();
    let recorder_kind = recorder.kind();
    let registry = JobRegistry::new();
    let supervisor = ExecutionSupervisor::new(
        registry.clone(),
        recorder,
        SystemClock,
        config.supervisor.clone(),
    );
    let service = JobService::new(
        registry,
        supervisor,
        RetentionSweeper::new(config.retention),
        SystemClock,
        config.recordings_dir.clone(),
    );

    info!(
        socket = %config.socket_path.display(),
        recordings = %config.recordings_dir.display(),
        recorder = recorder_kind,
        "daemon started",
    );

    Ok(StartupResult {
        daemon: DaemonState {
            config: config.clone(),
            service,
            recorder_kind,
            start_time: Instant::now(),
        },
        listener,
    })
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
