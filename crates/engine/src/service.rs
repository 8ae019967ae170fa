// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-layer facade over the registry, supervisor, and sweeper.

use crate::error::JobError;
use crate::registry::JobRegistry;
use crate::retention::RetentionSweeper;
use crate::supervisor::ExecutionSupervisor;
use mb_adapters::Automation;
use mb_core::{Clock, JobId, JobRecord, JobStatus, RecordingParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Aggregate counts over the registry at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStats {
    pub total: usize,
    /// Non-terminal jobs, `starting` included
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
    /// Mean `duration_seconds` over terminal jobs, 0 when there are none
    pub average_duration_seconds: f64,
}

impl JobStats {
    fn from_records(records: &[JobRecord]) -> Self {
        let mut stats = JobStats { total: records.len(), ..Default::default() };
        let mut duration_sum = 0.0;
        let mut finished = 0usize;
        for job in records {
            match job.status() {
                JobStatus::Starting | JobStatus::Running => stats.running += 1,
                JobStatus::Completed => stats.completed += 1,
                JobStatus::Failed => stats.failed += 1,
                JobStatus::Cancelled => stats.cancelled += 1,
            }
            if let Some(secs) = job.duration_seconds() {
                duration_sum += secs;
                finished += 1;
            }
        }
        if finished > 0 {
            stats.average_duration_seconds = duration_sum / finished as f64;
        }
        stats
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq)]
pub struct Deletion {
    /// The record as it was when removed
    pub record: JobRecord,
    /// True when the job was still live and got cancelled first
    pub cancelled: bool,
    /// Artifact files removed from disk
    pub purged: Vec<PathBuf>,
}

/// Entry point for everything outside the engine.
///
/// Creation validates synchronously and returns a `starting` record; the run
/// itself proceeds in the background and only ever reports through the
/// record. Reads that scan the whole registry sweep expired jobs first.
#[derive(Clone)]
pub struct JobService<A: Automation, C: Clock> {
    registry: JobRegistry,
    supervisor: ExecutionSupervisor<A, C>,
    sweeper: RetentionSweeper,
    clock: C,
    /// Only artifacts under this root are ever purged
    recordings_dir: PathBuf,
}

impl<A: Automation, C: Clock> JobService<A, C> {
    pub fn new(
        registry: JobRegistry,
        supervisor: ExecutionSupervisor<A, C>,
        sweeper: RetentionSweeper,
        clock: C,
        recordings_dir: impl Into<PathBuf>,
    ) -> Self {
        Self { registry, supervisor, sweeper, clock, recordings_dir: recordings_dir.into() }
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub fn recordings_dir(&self) -> &Path {
        &self.recordings_dir
    }

    /// Validate `params`, create a job, and schedule it.
    ///
    /// Nothing is inserted when validation fails.
    pub fn create_job(&self, params: RecordingParams) -> Result<JobRecord, JobError> {
        params.validate()?;

        let record = JobRecord::new(JobId::new(), self.clock.epoch_ms());
        let snapshot = record.clone();
        let id = self.registry.create(record)?;
        info!(
            job_id = %id,
            duration_minutes = params.duration_minutes,
            "job created",
        );

        if let Err(e) = self.supervisor.spawn(&id, params) {
            // Only reachable if the record vanished or finished in between.
            warn!(job_id = %id, error = %e, "job created but not scheduled");
        }
        Ok(snapshot)
    }

    pub fn get_job(&self, id: &str) -> Result<JobRecord, JobError> {
        self.registry.get(id)
    }

    /// All jobs in creation order, after sweeping expired ones.
    pub fn list_jobs(&self) -> Vec<JobRecord> {
        self.sweep();
        self.registry.list()
    }

    /// Cancel a live job.
    pub fn cancel_job(&self, id: &str) -> Result<JobRecord, JobError> {
        self.supervisor.cancel(id)
    }

    /// Remove a job, cancelling it first if it is still live. With `purge`,
    /// its artifact files are removed too (best-effort).
    pub fn delete_job(&self, id: &str, purge: bool) -> Result<Deletion, JobError> {
        let cancelled = match self.supervisor.cancel(id) {
            Ok(_) => true,
            Err(JobError::AlreadyTerminal(..)) => false,
            // unscheduled job: removing the record keeps it from ever launching
            Err(JobError::NotFound(_)) => self.registry.get(id).map(|_| false)?,
            Err(e) => return Err(e),
        };
        let record = self.registry.delete(id)?;
        info!(job_id = %record.id(), cancelled, purge, "job deleted");

        let purged = if purge { self.purge_artifacts(&record) } else { Vec::new() };
        Ok(Deletion { record, cancelled, purged })
    }

    /// Counts over all jobs, after sweeping expired ones.
    pub fn stats(&self) -> JobStats {
        self.sweep();
        JobStats::from_records(&self.registry.list())
    }

    /// Run a retention sweep now.
    pub fn sweep(&self) -> Vec<JobId> {
        self.sweeper.sweep(&self.registry, self.clock.epoch_ms())
    }

    /// Cancel all live jobs with `message` and wait for their supervisors.
    pub async fn shutdown(&self, message: &str) {
        self.supervisor.shutdown(message).await;
    }

    fn purge_artifacts(&self, record: &JobRecord) -> Vec<PathBuf> {
        let mut purged = Vec::new();
        let mut dirs = Vec::new();
        for path in record.artifacts_under(&self.recordings_dir) {
            match std::fs::remove_file(path) {
                Ok(()) => purged.push(path.to_path_buf()),
                Err(e) => warn!(path = %path.display(), error = %e, "failed to purge artifact"),
            }
            if let Some(parent) = path.parent() {
                if parent != self.recordings_dir && !dirs.iter().any(|d: &PathBuf| d == parent) {
                    dirs.push(parent.to_path_buf());
                }
            }
        }
        // Only empty per-job directories go; anything else the recorder left stays.
        for dir in dirs {
            if std::fs::remove_dir(&dir).is_err() {
                debug!(dir = %dir.display(), "job output directory kept");
            }
        }
        purged
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
