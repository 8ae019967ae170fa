// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::strategies::*;
use proptest::prelude::*;

fn running_job(created_at_ms: u64) -> JobRecord {
    let mut job = JobRecord::new(JobId::from_string("job-1"), created_at_ms);
    job.start("Joining meeting...").unwrap();
    job
}

#[test]
fn job_id_has_prefix() {
    let id = JobId::new();
    assert!(id.as_str().starts_with("job-"));
}

#[test]
fn new_record_is_starting_without_completion() {
    let job = JobRecord::new(JobId::from_string("job-1"), 5_000);
    assert_eq!(job.status(), JobStatus::Starting);
    assert_eq!(job.message(), JobRecord::CREATED_MESSAGE);
    assert_eq!(job.created_at_ms(), 5_000);
    assert!(job.completed_at_ms().is_none());
    assert!(job.duration_seconds().is_none());
    assert!(job.artifact_paths().is_empty());
}

#[test]
fn start_moves_to_running() {
    let job = running_job(0);
    assert_eq!(job.status(), JobStatus::Running);
    assert_eq!(job.message(), "Joining meeting...");
}

#[test]
fn start_twice_is_rejected() {
    let mut job = running_job(0);
    let err = job.start("again").unwrap_err();
    assert!(matches!(err, TransitionError::NotStarting { status: JobStatus::Running, .. }));
}

#[test]
fn complete_records_artifacts_and_duration() {
    let mut job = running_job(10_000);
    let paths = vec![PathBuf::from("/rec/output.mp4"), PathBuf::from("/rec/transcript.json")];
    job.complete(paths.clone(), "done", 70_500).unwrap();

    assert_eq!(job.status(), JobStatus::Completed);
    assert_eq!(job.completed_at_ms(), Some(70_500));
    assert_eq!(job.duration_seconds(), Some(60.5));
    assert_eq!(job.artifact_paths(), paths.as_slice());
}

#[yare::parameterized(
    failed = { JobStatus::Failed },
    cancelled = { JobStatus::Cancelled },
)]
fn non_success_terminals_have_no_artifacts(status: JobStatus) {
    let mut job = running_job(0);
    match status {
        JobStatus::Failed => job.fail("boom", 1_000).unwrap(),
        _ => job.cancel("stop", 1_000).unwrap(),
    }
    assert_eq!(job.status(), status);
    assert_eq!(job.duration_seconds(), Some(1.0));
    assert!(job.artifact_paths().is_empty());
}

#[test]
fn cancel_from_starting_is_allowed() {
    let mut job = JobRecord::new(JobId::from_string("job-1"), 0);
    job.cancel("cancelled before launch", 10).unwrap();
    assert_eq!(job.status(), JobStatus::Cancelled);
}

#[test]
fn terminal_states_are_absorbing() {
    let mut job = running_job(0);
    job.complete(vec![], "done", 1_000).unwrap();
    let snapshot = job.clone();

    assert!(matches!(
        job.cancel("late", 2_000),
        Err(TransitionError::AlreadyTerminal { status: JobStatus::Completed, .. })
    ));
    assert!(job.fail("late", 2_000).is_err());
    assert!(job.start("late").is_err());
    assert_eq!(job, snapshot);
}

#[test]
fn clock_skew_does_not_produce_negative_duration() {
    let mut job = running_job(5_000);
    job.fail("skewed", 4_000).unwrap();
    assert_eq!(job.duration_seconds(), Some(0.0));
}

#[yare::parameterized(
    live_job_never_expires = { None, 1_000, false },
    completed_before_cutoff = { Some(500), 1_000, true },
    completed_at_cutoff = { Some(1_000), 1_000, false },
    completed_after_cutoff = { Some(1_500), 1_000, false },
)]
fn completed_before_cutoff(completed_at: Option<u64>, cutoff: u64, expected: bool) {
    let mut job = running_job(0);
    if let Some(at) = completed_at {
        job.fail("x", at).unwrap();
    }
    assert_eq!(job.completed_before(cutoff), expected);
}

#[test]
fn artifacts_under_filters_by_root() {
    let mut job = running_job(0);
    job.complete(
        vec![PathBuf::from("/rec/job-1/output.mp4"), PathBuf::from("/etc/passwd")],
        "done",
        1,
    )
    .unwrap();
    let inside: Vec<_> = job.artifacts_under(Path::new("/rec")).collect();
    assert_eq!(inside, vec![Path::new("/rec/job-1/output.mp4")]);
}

#[test]
fn status_display_and_serde_agree() {
    for status in [
        JobStatus::Starting,
        JobStatus::Running,
        JobStatus::Completed,
        JobStatus::Failed,
        JobStatus::Cancelled,
    ] {
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, format!("\"{}\"", status));
    }
}

#[test]
fn record_serializes_without_empty_optionals() {
    let job = JobRecord::new(JobId::from_string("job-1"), 7);
    let value = serde_json::to_value(&job).unwrap();
    assert_eq!(value["status"], "starting");
    assert!(value.get("completed_at_ms").is_none());
    assert!(value.get("artifact_paths").is_none());

    let back: JobRecord = serde_json::from_value(value).unwrap();
    assert_eq!(back, job);
}

fn rank(status: JobStatus) -> u8 {
    match status {
        JobStatus::Starting => 0,
        JobStatus::Running => 1,
        _ => 2,
    }
}

proptest! {
    #[test]
    fn transitions_only_move_forward(steps in proptest::collection::vec(arb_transition(), 0..20)) {
        let mut job = JobRecord::new(JobId::from_string("job-p"), 100);
        let mut terminal: Option<JobRecord> = None;

        for step in steps {
            let before = job.status();
            let _ = match step {
                Transition::Start => job.start("running"),
                Transition::Complete(at) => job.complete(vec![], "ok", at),
                Transition::Fail(at) => job.fail("err", at),
                Transition::Cancel(at) => job.cancel("stop", at),
            };
            prop_assert!(rank(job.status()) >= rank(before));

            // completed_at and duration are present iff terminal
            prop_assert_eq!(job.completed_at_ms().is_some(), job.is_terminal());
            prop_assert_eq!(job.duration_seconds().is_some(), job.is_terminal());
            if let (Some(at), Some(d)) = (job.completed_at_ms(), job.duration_seconds()) {
                prop_assert!(d >= 0.0);
                prop_assert_eq!(d, at.saturating_sub(100) as f64 / 1000.0);
            }

            match terminal.clone() {
                Some(frozen) => prop_assert_eq!(frozen, job.clone()),
                None if job.is_terminal() => terminal = Some(job.clone()),
                None => {}
            }
        }
    }
}
