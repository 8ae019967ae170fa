// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: configuration, startup, shutdown.

mod startup;
pub use startup::startup;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use mb_adapters::{CommandAutomation, RecorderRouter, SimulatedAutomation};
use mb_core::SystemClock;
use mb_engine::{JobService, SupervisorConfig, DEFAULT_MAX_AGE};
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

use crate::env;

/// Job service with the daemon's concrete adapter types
pub type DaemonService = JobService<RecorderRouter, SystemClock>;

/// Message recorded on jobs cancelled because the daemon is stopping
pub const SHUTDOWN_MESSAGE: &str = "Job cancelled: daemon shutting down";

/// Which recorder backs the jobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderConfig {
    /// External program, run once per job
    Command { program: PathBuf, args: Vec<String> },
    /// Built-in stand-in that writes placeholder artifacts after a delay
    Simulated { delay: Duration },
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/mb)
    pub state_dir: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Root of per-job output directories
    pub recordings_dir: PathBuf,
    pub recorder: RecorderConfig,
    pub supervisor: SupervisorConfig,
    /// Age after which finished jobs are swept
    pub retention: Duration,
    /// Optional periodic sweep on top of the sweeps before list/stats
    pub sweep_interval: Option<Duration>,
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = env::state_dir()?;
        let recorder = match env::recorder_cmd() {
            Some(program) => RecorderConfig::Command { program, args: Vec::new() },
            None => RecorderConfig::Simulated { delay: env::simulated_delay() },
        };

        Ok(Self {
            socket_path: state_dir.join("daemon.sock"),
            log_path: state_dir.join("daemon.log"),
            recordings_dir: env::recordings_dir(&state_dir),
            recorder,
            supervisor: SupervisorConfig::default()
                .deadline_buffer(env::deadline_buffer())
                .cancel_grace(env::cancel_grace()),
            retention: env::retention(),
            sweep_interval: env::sweep_interval(),
            state_dir,
        })
    }

    /// Defaults rooted at `state_dir`, ignoring the environment.
    pub fn for_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Self {
            socket_path: state_dir.join("daemon.sock"),
            log_path: state_dir.join("daemon.log"),
            recordings_dir: state_dir.join("recordings"),
            recorder: RecorderConfig::Simulated { delay: Duration::from_secs(2) },
            supervisor: SupervisorConfig::default(),
            retention: DEFAULT_MAX_AGE,
            sweep_interval: None,
            state_dir,
        }
    }

    /// Build the recorder adapter this configuration selects.
    pub fn recorder(&self) -> RecorderRouter {
        match &self.recorder {
            RecorderConfig::Command { program, args } => {
                CommandAutomation::new(program.clone(), &self.recordings_dir)
                    .with_args(args.iter().cloned())
                    .into()
            }
            RecorderConfig::Simulated { delay } => {
                SimulatedAutomation::new(*delay, &self.recordings_dir).into()
            }
        }
    }
}

/// Daemon state during operation.
pub struct DaemonState {
    pub config: Config,
    pub service: DaemonService,
    /// Backend name reported by `Ping`
    pub recorder_kind: &'static str,
    /// When daemon started
    pub start_time: Instant,
}

/// Result of daemon startup: the daemon state plus the bound socket.
pub struct StartupResult {
    pub daemon: DaemonState,
    /// The Unix socket listener to spawn as a task
    pub listener: UnixListener,
}

impl DaemonState {
    /// Shutdown the daemon gracefully.
    ///
    /// Every live job is cancelled and its supervisor awaited, then the
    /// socket file is removed. Nothing is saved: jobs do not survive a restart.
    pub async fn shutdown(&self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        self.service.shutdown(SHUTDOWN_MESSAGE).await;

        if self.config.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.socket_path) {
                warn!("Failed to remove socket file: {}", e);
            }
        }

        info!("Daemon shutdown complete");
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Daemon already running (socket {0} is accepting connections)")]
    AlreadyRunning(PathBuf),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
