// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mbd: the meeting recorder daemon.
//!
//! Serves the job API on a Unix socket under the state directory. All job
//! state is in memory and is lost when the daemon exits.

use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use mb_daemon::lifecycle::DaemonService;
use mb_daemon::{startup, Config, LifecycleError, ListenCtx, Listener, StartupResult};
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    std::fs::create_dir_all(&config.state_dir)?;
    let _log_guard = init_tracing(&config);

    let StartupResult { daemon, listener } = match startup(&config).await {
        Ok(result) => result,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            return Err(e.into());
        }
    };

    let shutdown = CancellationToken::new();
    let ctx = Arc::new(ListenCtx::new(&daemon, shutdown.clone()));
    let listener_task = tokio::spawn(Listener::new(listener, ctx).run());

    if let Some(interval) = config.sweep_interval {
        tokio::spawn(sweep_loop(daemon.service.clone(), interval, shutdown.clone()));
    }

    println!("READY");

    let mut sigterm = signal(SignalKind::terminate()).map_err(LifecycleError::Io)?;
    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("received SIGINT"),
        _ = sigterm.recv() => info!("received SIGTERM"),
        _ = shutdown.cancelled() => {}
    }
    shutdown.cancel();

    daemon.shutdown().await?;
    if let Err(e) = listener_task.await {
        error!(error = %e, "listener task failed");
    }
    Ok(())
}

/// Log to `<state_dir>/daemon.log`. `RUST_LOG` overrides the default `info`.
fn init_tracing(config: &Config) -> WorkerGuard {
    let dir = config.log_path.parent().unwrap_or(&config.state_dir);
    let file = config.log_path.file_name().unwrap_or_else(|| OsStr::new("daemon.log"));
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
    guard
}

/// Periodic retention sweep, on top of the sweeps before list and stats.
async fn sweep_loop(service: DaemonService, interval: Duration, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                service.sweep();
            }
            _ = shutdown.cancelled() => return,
        }
    }
}
