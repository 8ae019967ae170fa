// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job lifecycle specs
//!
//! Create, run, cancel, delete, and count jobs over the socket.

use crate::prelude::*;

#[tokio::test]
async fn recorded_job_completes_with_artifacts() {
    let daemon = TestDaemon::start().await;

    let job = daemon.client.create_job(params("ok")).await.unwrap();
    assert_eq!(job.status(), JobStatus::Starting);

    let job = daemon.wait_terminal(job.id().as_str()).await;
    assert_eq!(job.status(), JobStatus::Completed, "message: {}", job.message());
    assert_eq!(job.artifact_paths().len(), 2);
    assert!(job.artifact_paths().iter().all(|p| p.exists()));
    assert!(job.artifact_paths()[0].starts_with(daemon.recordings_dir().join(job.id().as_str())));
    assert!(job.duration_seconds().is_some());

    daemon.stop().await;
}

#[tokio::test]
async fn missing_required_field_is_rejected_and_nothing_is_created() {
    let daemon = TestDaemon::start().await;
    let mut params = params("ok");
    params.email = String::new();

    let err = daemon.client.create_job(params).await.unwrap_err();

    match err {
        ClientError::Rejected { kind, message } => {
            assert_eq!(kind, ErrorKind::Validation);
            assert!(message.contains("email"), "{}", message);
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(daemon.client.list_jobs().await.unwrap().is_empty());

    daemon.stop().await;
}

#[tokio::test]
async fn recorder_failure_fails_the_job() {
    let daemon = TestDaemon::start().await;

    let job = daemon.client.create_job(params("fail")).await.unwrap();
    let job = daemon.wait_terminal(job.id().as_str()).await;

    assert_eq!(job.status(), JobStatus::Failed);
    assert!(job.message().contains("could not join meeting"), "{}", job.message());

    daemon.stop().await;
}

#[tokio::test]
async fn success_without_output_files_fails_the_job() {
    let daemon = TestDaemon::start().await;

    let job = daemon.client.create_job(params("empty")).await.unwrap();
    let job = daemon.wait_terminal(job.id().as_str()).await;

    assert_eq!(job.status(), JobStatus::Failed);
    assert!(job.message().contains("output files not found"), "{}", job.message());
    assert!(job.artifact_paths().is_empty());

    daemon.stop().await;
}

#[tokio::test]
async fn overrunning_recorder_times_out() {
    let daemon = TestDaemon::start_with(|config| {
        config.supervisor.deadline_buffer = Duration::from_millis(300);
    })
    .await;
    let mut params = params("hang");
    params.duration_minutes = 0;

    let job = daemon.client.create_job(params).await.unwrap();
    let job = daemon.wait_terminal(job.id().as_str()).await;

    assert_eq!(job.status(), JobStatus::Failed);
    assert!(job.message().contains("timed out"), "{}", job.message());

    daemon.stop().await;
}

#[tokio::test]
async fn cancel_running_job_then_cancel_again() {
    let daemon = TestDaemon::start().await;
    let job = daemon.client.create_job(params("hang")).await.unwrap();
    let id = job.id().to_string();
    daemon.wait_for(&id, |j| j.status() == JobStatus::Running).await;

    let cancelled = daemon.client.cancel_job(&id).await.unwrap();
    assert_eq!(cancelled.status(), JobStatus::Cancelled);
    assert!(cancelled.completed_at_ms().is_some());

    let err = daemon.client.cancel_job(&id).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected { kind: ErrorKind::AlreadyTerminal, .. }));

    // the killed recorder does not overwrite the cancellation
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(daemon.client.get_job(&id).await.unwrap(), cancelled);

    daemon.stop().await;
}

#[tokio::test]
async fn three_jobs_one_completed() {
    let daemon = TestDaemon::start().await;
    let done = daemon.client.create_job(params("ok")).await.unwrap();
    daemon.client.create_job(params("hang")).await.unwrap();
    daemon.client.create_job(params("hang")).await.unwrap();
    daemon.wait_for(done.id().as_str(), |j| j.status() == JobStatus::Completed).await;

    let jobs = daemon.client.list_jobs().await.unwrap();
    assert_eq!(jobs.len(), 3);
    assert_eq!(jobs[0].status(), JobStatus::Completed);
    assert!(jobs[1..].iter().all(|j| !j.is_terminal()));

    let stats = daemon.client.stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.running, 2);
    assert_eq!(stats.failed, 0);

    daemon.stop().await;
}

#[tokio::test]
async fn delete_with_purge_removes_record_and_files() {
    let daemon = TestDaemon::start().await;
    let job = daemon.client.create_job(params("ok")).await.unwrap();
    let job = daemon.wait_terminal(job.id().as_str()).await;
    let id = job.id().to_string();

    let (cancelled, purged) = daemon.client.delete_job(&id, true).await.unwrap();

    assert!(!cancelled);
    assert_eq!(purged, job.artifact_paths());
    assert!(purged.iter().all(|p| !p.exists()));
    let err = daemon.client.get_job(&id).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected { kind: ErrorKind::NotFound, .. }));

    daemon.stop().await;
}

#[tokio::test]
async fn delete_running_job_cancels_it() {
    let daemon = TestDaemon::start().await;
    let job = daemon.client.create_job(params("hang")).await.unwrap();

    let (cancelled, _) = daemon.client.delete_job(job.id().as_str(), false).await.unwrap();

    assert!(cancelled);
    assert!(daemon.client.list_jobs().await.unwrap().is_empty());

    daemon.stop().await;
}
