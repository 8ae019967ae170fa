// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier, record, and state machine.
//!
//! ```text
//! starting ──► running ──► completed
//!    │            ├──────► failed
//!    └────────────┴──────► cancelled
//! ```
//!
//! Terminal states are absorbing: every mutator refuses to touch a record
//! once it has reached one.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

crate::define_id! {
    /// Unique identifier for a recording job.
    ///
    /// Assigned when the job is created and never changes. Used to query,
    /// cancel, and delete the job, and to name its output directory.
    pub struct JobId("job-");
}

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created; the automation has not been launched yet
    Starting,
    /// Automation launched and in flight
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled)
    }
}

crate::simple_display! {
    JobStatus {
        Starting => "starting",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

/// Rejected state transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("job {id} is already {status}")]
    AlreadyTerminal { id: JobId, status: JobStatus },

    #[error("job {id} cannot start from {status}")]
    NotStarting { id: JobId, status: JobStatus },
}

/// One requested recording run and its lifecycle state.
///
/// Fields are read through accessors; the only way to change a record is
/// through the transition methods, which keep `completed_at_ms` and
/// `duration_seconds` present exactly when the status is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    id: JobId,
    status: JobStatus,
    message: String,
    created_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    artifact_paths: Vec<PathBuf>,
}

impl JobRecord {
    pub const CREATED_MESSAGE: &'static str = "Job created and starting...";

    /// Create a record in `starting`.
    pub fn new(id: JobId, created_at_ms: u64) -> Self {
        Self {
            id,
            status: JobStatus::Starting,
            message: Self::CREATED_MESSAGE.to_string(),
            created_at_ms,
            completed_at_ms: None,
            duration_seconds: None,
            artifact_paths: Vec::new(),
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn created_at_ms(&self) -> u64 {
        self.created_at_ms
    }

    pub fn completed_at_ms(&self) -> Option<u64> {
        self.completed_at_ms
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration_seconds
    }

    pub fn artifact_paths(&self) -> &[PathBuf] {
        &self.artifact_paths
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Move `starting` → `running`.
    pub fn start(&mut self, message: impl Into<String>) -> Result<(), TransitionError> {
        self.ensure_live()?;
        if self.status != JobStatus::Starting {
            return Err(TransitionError::NotStarting { id: self.id.clone(), status: self.status });
        }
        self.status = JobStatus::Running;
        self.message = message.into();
        Ok(())
    }

    /// Terminal success. Artifact paths are only ever recorded here.
    pub fn complete(
        &mut self,
        artifact_paths: Vec<PathBuf>,
        message: impl Into<String>,
        completed_at_ms: u64,
    ) -> Result<(), TransitionError> {
        self.finish(JobStatus::Completed, message.into(), completed_at_ms)?;
        self.artifact_paths = artifact_paths;
        Ok(())
    }

    pub fn fail(
        &mut self,
        message: impl Into<String>,
        completed_at_ms: u64,
    ) -> Result<(), TransitionError> {
        self.finish(JobStatus::Failed, message.into(), completed_at_ms)
    }

    pub fn cancel(
        &mut self,
        message: impl Into<String>,
        completed_at_ms: u64,
    ) -> Result<(), TransitionError> {
        self.finish(JobStatus::Cancelled, message.into(), completed_at_ms)
    }

    /// True when the job reached a terminal state strictly before `cutoff_ms`.
    /// Live jobs are never considered expired, however old.
    pub fn completed_before(&self, cutoff_ms: u64) -> bool {
        self.completed_at_ms.is_some_and(|at| at < cutoff_ms)
    }

    /// Iterate artifact paths that fall inside `root`.
    pub fn artifacts_under<'a>(&'a self, root: &'a Path) -> impl Iterator<Item = &'a Path> + 'a {
        self.artifact_paths.iter().map(PathBuf::as_path).filter(move |p| p.starts_with(root))
    }

    fn finish(
        &mut self,
        status: JobStatus,
        message: String,
        completed_at_ms: u64,
    ) -> Result<(), TransitionError> {
        self.ensure_live()?;
        let elapsed_ms = completed_at_ms.saturating_sub(self.created_at_ms);
        self.status = status;
        self.message = message;
        self.completed_at_ms = Some(completed_at_ms);
        self.duration_seconds = Some(elapsed_ms as f64 / 1000.0);
        Ok(())
    }

    fn ensure_live(&self) -> Result<(), TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::AlreadyTerminal {
                id: self.id.clone(),
                status: self.status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
