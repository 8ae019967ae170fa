// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests.

use crate::{ExecutionSupervisor, JobRegistry, JobService, RetentionSweeper, SupervisorConfig};
use mb_adapters::{expected_artifacts, job_output_dir, FakeAutomation};
use mb_core::{Clock, FakeClock, JobId, JobRecord, Outcome, RecordingParams};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

pub(crate) const HOUR_MS: u64 = 60 * 60 * 1000;

/// Valid params with a one-minute recording budget.
pub(crate) fn params() -> RecordingParams {
    RecordingParams::builder().build()
}

pub(crate) struct TestContext {
    pub registry: JobRegistry,
    pub automation: FakeAutomation,
    pub clock: FakeClock,
    pub supervisor: ExecutionSupervisor<FakeAutomation, FakeClock>,
    pub service: JobService<FakeAutomation, FakeClock>,
    pub recordings: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_automation(FakeAutomation::default())
    }

    pub fn with_automation(automation: FakeAutomation) -> Self {
        let recordings = tempfile::tempdir().unwrap();
        let registry = JobRegistry::new();
        let clock = FakeClock::new();
        let config = SupervisorConfig::default()
            .deadline_buffer(Duration::from_secs(60))
            .cancel_grace(Duration::from_secs(5));
        let supervisor =
            ExecutionSupervisor::new(registry.clone(), automation.clone(), clock.clone(), config);
        let service = JobService::new(
            registry.clone(),
            supervisor.clone(),
            RetentionSweeper::default(),
            clock.clone(),
            recordings.path(),
        );
        Self { registry, automation, clock, supervisor, service, recordings }
    }

    /// Insert a `starting` record without scheduling it.
    pub fn insert_starting(&self) -> JobId {
        let record = JobRecord::new(JobId::new(), self.clock.epoch_ms());
        self.registry.create(record).unwrap()
    }

    /// Create the artifacts a successful run would leave for `id`.
    pub fn write_artifacts(&self, id: &JobId) -> Vec<PathBuf> {
        let dir = job_output_dir(self.recordings.path(), id);
        std::fs::create_dir_all(&dir).unwrap();
        let paths = expected_artifacts(&dir);
        for path in &paths {
            std::fs::write(path, b"data").unwrap();
        }
        paths
    }

    pub fn recordings_dir(&self) -> &Path {
        self.recordings.path()
    }
}

pub(crate) fn success(paths: Vec<PathBuf>) -> Outcome {
    Outcome::Success { artifact_paths: paths }
}

/// Poll until `id` reaches a terminal state. Use with paused time.
pub(crate) async fn wait_terminal(registry: &JobRegistry, id: &str) -> JobRecord {
    for _ in 0..10_000 {
        let job = registry.get(id).unwrap();
        if job.is_terminal() {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} never reached a terminal state", id);
}
