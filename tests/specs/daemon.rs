// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle specs
//!
//! Health, sweeping, and shutdown over the socket.

use crate::prelude::*;

#[tokio::test]
async fn ping_answers() {
    let daemon = TestDaemon::start().await;

    let uptime = daemon.client.ping().await.unwrap();
    assert!(uptime < 60);

    daemon.stop().await;
}

#[tokio::test]
async fn sweep_keeps_fresh_jobs() {
    let daemon = TestDaemon::start().await;
    let job = daemon.client.create_job(params("ok")).await.unwrap();
    daemon.wait_terminal(job.id().as_str()).await;

    let removed = daemon.client.sweep().await.unwrap();

    assert!(removed.is_empty());
    assert_eq!(daemon.client.list_jobs().await.unwrap().len(), 1);

    daemon.stop().await;
}

#[tokio::test]
async fn zero_retention_sweeps_finished_jobs_but_not_live_ones() {
    let daemon = TestDaemon::start_with(|config| config.retention = Duration::ZERO).await;
    let finished = daemon.client.create_job(params("fail")).await.unwrap();
    daemon.wait_terminal(finished.id().as_str()).await;
    let live = daemon.client.create_job(params("hang")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let jobs = daemon.client.list_jobs().await.unwrap();

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id(), live.id());

    daemon.stop().await;
}

#[tokio::test]
async fn shutdown_request_cancels_live_jobs() {
    let daemon = TestDaemon::start().await;
    let job = daemon.client.create_job(params("hang")).await.unwrap();
    daemon.wait_for(job.id().as_str(), |j| j.status() == JobStatus::Running).await;

    daemon.client.shutdown().await.unwrap();
    let socket = daemon.config.socket_path.clone();
    let jobs = daemon.wait_stopped().await;

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].status(), JobStatus::Cancelled);
    assert!(!socket.exists());
}

#[tokio::test]
async fn unreachable_socket_is_a_connect_error() {
    let dir = tempfile::tempdir().unwrap();
    let client = DaemonClient::new(dir.path().join("nope.sock"));

    let err = client.ping().await.unwrap_err();

    assert!(matches!(err, ClientError::Connect { .. }));
}
