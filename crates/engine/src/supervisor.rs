// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job execution supervision.
//!
//! Each scheduled job gets one supervisory task. It launches the automation
//! in a task of its own and waits for whichever comes first:
//!
//! - the automation returns (success is checked against the filesystem)
//! - the deadline (`duration_budget + deadline_buffer`) passes
//! - the job's cancellation token fires (user cancel, delete, shutdown)
//!
//! Exactly one terminal transition is applied per job. The registry makes
//! "transition + drop handle" atomic, so an outcome arriving after a cancel
//! is discarded instead of overwriting it.

use crate::error::{ExecutionError, JobError};
use crate::handle::ExecutionHandle;
use crate::registry::JobRegistry;
use mb_adapters::{Automation, AutomationError, ExecutionRequest};
use mb_core::{format_duration, Clock, JobId, JobRecord, Outcome, RecordingParams};
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

pub(crate) const RUNNING_MESSAGE: &str = "Joining meeting...";
pub(crate) const COMPLETED_MESSAGE: &str = "Recording completed successfully";
pub(crate) const CANCELLED_MESSAGE: &str = "Job cancelled by user";
const ABANDONED_MESSAGE: &str = "Recording failed unexpectedly: supervisor stopped";

/// Supervisor tuning.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Extra time past the recording budget before a run is timed out
    pub deadline_buffer: Duration,
    /// How long a cancelled automation gets to wind down before it is aborted
    pub cancel_grace: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self { deadline_buffer: Duration::from_secs(10 * 60), cancel_grace: Duration::from_secs(5) }
    }
}

impl SupervisorConfig {
    mb_core::setters! {
        set {
            deadline_buffer: Duration,
            cancel_grace: Duration,
        }
    }
}

/// How a run ended, before it is written to the registry.
#[derive(Debug)]
enum Verdict {
    Completed(Vec<PathBuf>),
    Failed(ExecutionError),
    Cancelled,
}

/// Launches and watches automation runs.
#[derive(Clone)]
pub struct ExecutionSupervisor<A: Automation, C: Clock> {
    registry: JobRegistry,
    automation: A,
    clock: C,
    config: SupervisorConfig,
    tracker: TaskTracker,
}

impl<A: Automation, C: Clock> ExecutionSupervisor<A, C> {
    pub fn new(registry: JobRegistry, automation: A, clock: C, config: SupervisorConfig) -> Self {
        Self { registry, automation, clock, config, tracker: TaskTracker::new() }
    }

    /// Wall time a run with `params` may take before it is timed out.
    pub fn deadline_for(&self, params: &RecordingParams) -> Duration {
        params.duration_budget() + self.config.deadline_buffer
    }

    /// Schedule a `starting` job.
    ///
    /// The handle is registered before this returns, so the job can be
    /// cancelled immediately even if its task has not been polled yet.
    pub fn spawn(&self, id: &JobId, params: RecordingParams) -> Result<JoinHandle<()>, JobError> {
        let handle = ExecutionHandle::new();
        let token = handle.token();
        self.registry.attach_handle(id, handle)?;

        let this = self.clone();
        let id = id.clone();
        Ok(self.tracker.spawn(async move { this.run(id, params, token).await }))
    }

    /// Cancel a live job and signal its automation to stop.
    pub fn cancel(&self, id: &str) -> Result<JobRecord, JobError> {
        let (job, handle) = self.registry.cancel(id, CANCELLED_MESSAGE, self.clock.epoch_ms())?;
        handle.cancel();
        info!(job_id = %job.id(), "job cancelled");
        Ok(job)
    }

    /// Cancel every live job with `message`. Returns how many were cancelled.
    pub fn cancel_all(&self, message: &str) -> usize {
        let mut cancelled = 0;
        for id in self.registry.live_ids() {
            match self.registry.cancel(id.as_str(), message, self.clock.epoch_ms()) {
                Ok((_, handle)) => {
                    handle.cancel();
                    cancelled += 1;
                }
                Err(e) => debug!(job_id = %id, error = %e, "skipped during cancel_all"),
            }
        }
        cancelled
    }

    /// Cancel everything and wait for every supervisory task to finish.
    pub async fn shutdown(&self, message: &str) {
        let cancelled = self.cancel_all(message);
        if cancelled > 0 {
            info!(cancelled, "cancelled live jobs for shutdown");
        }
        self.tracker.close();
        self.tracker.wait().await;
    }

    async fn run(self, id: JobId, params: RecordingParams, token: CancellationToken) {
        let mut guard = FinalizeGuard {
            registry: self.registry.clone(),
            clock: self.clock.clone(),
            id: id.clone(),
            token: token.clone(),
            armed: true,
        };

        if token.is_cancelled() {
            debug!(job_id = %id, "job cancelled before launch");
            guard.armed = false;
            return;
        }
        match self.registry.update(id.as_str(), |job| job.start(RUNNING_MESSAGE)) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                debug!(job_id = %id, error = %e, "job not launched");
                guard.armed = false;
                return;
            }
            Err(_) => {
                debug!(job_id = %id, "job deleted before launch");
                guard.armed = false;
                return;
            }
        }

        let budget = params.duration_budget();
        let deadline = self.deadline_for(&params);
        let automation_token = token.child_token();
        let request = ExecutionRequest { job_id: id.clone(), params };
        let automation = self.automation.clone();
        let exec_token = automation_token.clone();
        let mut task = tokio::spawn(async move { automation.execute(request, exec_token).await });
        info!(job_id = %id, deadline = %format_duration(deadline), "recording launched");

        // The verdict is recorded before any draining, so the handle is gone
        // the moment the deadline or cancel fires.
        let (verdict, straggler) = tokio::select! {
            joined = &mut task => {
                if token.is_cancelled() {
                    (Verdict::Cancelled, None)
                } else {
                    (judge(joined).await, None)
                }
            }
            _ = tokio::time::sleep(deadline) => {
                warn!(job_id = %id, deadline = %format_duration(deadline), "recording exceeded its deadline");
                automation_token.cancel();
                let timeout = ExecutionError::Timeout { budget, buffer: self.config.deadline_buffer };
                (Verdict::Failed(timeout), Some(task))
            }
            _ = token.cancelled() => (Verdict::Cancelled, Some(task)),
        };

        guard.finish(verdict);
        if let Some(task) = straggler {
            self.drain(&id, task).await;
        }
    }

    /// Give a cancelled automation `cancel_grace` to return, then abort it.
    async fn drain(&self, id: &JobId, mut task: JoinHandle<Result<Outcome, AutomationError>>) {
        if tokio::time::timeout(self.config.cancel_grace, &mut task).await.is_err() {
            warn!(
                job_id = %id,
                grace = %format_duration(self.config.cancel_grace),
                "automation ignored cancellation, aborting",
            );
            task.abort();
        }
    }
}

/// Turn a finished automation task into a verdict.
///
/// A success is only believed once every artifact it names exists.
async fn judge(joined: Result<Result<Outcome, AutomationError>, JoinError>) -> Verdict {
    match joined {
        Ok(Ok(Outcome::Success { artifact_paths })) => {
            if artifact_paths.is_empty() {
                return Verdict::Failed(ExecutionError::MissingArtifacts(Vec::new()));
            }
            let mut missing = Vec::new();
            for path in &artifact_paths {
                if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                    missing.push(path.clone());
                }
            }
            if missing.is_empty() {
                Verdict::Completed(artifact_paths)
            } else {
                Verdict::Failed(ExecutionError::MissingArtifacts(missing))
            }
        }
        Ok(Ok(Outcome::Failure { reason })) => Verdict::Failed(ExecutionError::Failure(reason)),
        Ok(Err(e)) => Verdict::Failed(ExecutionError::Unexpected(e.to_string())),
        Err(e) if e.is_panic() => {
            Verdict::Failed(ExecutionError::Unexpected("automation panicked".to_string()))
        }
        Err(e) => Verdict::Failed(ExecutionError::Unexpected(e.to_string())),
    }
}

/// Writes the job's terminal state exactly once.
///
/// If the supervisory task is dropped before a verdict is reached (aborted,
/// runtime shut down), the job is failed on drop so it never stays live
/// without a supervisor.
struct FinalizeGuard<C: Clock> {
    registry: JobRegistry,
    clock: C,
    id: JobId,
    token: CancellationToken,
    armed: bool,
}

impl<C: Clock> FinalizeGuard<C> {
    fn finish(mut self, verdict: Verdict) {
        self.armed = false;
        let id = self.id.as_str();
        let now_ms = self.clock.epoch_ms();
        let result = match verdict {
            Verdict::Completed(paths) => {
                self.registry.finish(id, |job| job.complete(paths, COMPLETED_MESSAGE, now_ms))
            }
            Verdict::Failed(err) => self.registry.finish(id, |job| job.fail(err.to_string(), now_ms)),
            Verdict::Cancelled => {
                self.registry.finish(id, |job| job.cancel(CANCELLED_MESSAGE, now_ms))
            }
        };

        match result {
            Ok(job) if job.status() == mb_core::JobStatus::Completed => info!(
                job_id = %job.id(),
                duration_secs = job.duration_seconds().unwrap_or_default(),
                artifacts = job.artifact_paths().len(),
                "job completed",
            ),
            Ok(job) => warn!(
                job_id = %job.id(),
                status = %job.status(),
                message = job.message(),
                "job did not complete",
            ),
            Err(JobError::AlreadyTerminal(_, status)) => {
                debug!(job_id = %self.id, %status, "outcome discarded, job already terminal")
            }
            Err(JobError::NotFound(_)) => {
                debug!(job_id = %self.id, "outcome discarded, job was deleted")
            }
            Err(e) => error!(job_id = %self.id, error = %e, "failed to record job outcome"),
        }
    }
}

impl<C: Clock> Drop for FinalizeGuard<C> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.token.cancel();
        let now_ms = self.clock.epoch_ms();
        if let Ok(job) = self.registry.finish(self.id.as_str(), |job| job.fail(ABANDONED_MESSAGE, now_ms))
        {
            error!(job_id = %job.id(), "supervisor stopped before the job finished");
        }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
