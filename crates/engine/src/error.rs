// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types

use mb_core::{format_duration, JobId, JobStatus, TransitionError, ValidationError};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors returned to callers of the engine.
///
/// Only creation-time validation and lookups fail synchronously. Anything
/// that goes wrong while a job runs is recorded in the job instead.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("job not found: {0}")]
    NotFound(JobId),

    #[error("job {0} is already {1}")]
    AlreadyTerminal(JobId, JobStatus),

    #[error("job {0} cannot start from {1}")]
    InvalidTransition(JobId, JobStatus),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("job id collision: {0}")]
    IdCollision(JobId),
}

impl From<TransitionError> for JobError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::AlreadyTerminal { id, status } => JobError::AlreadyTerminal(id, status),
            TransitionError::NotStarting { id, status } => JobError::InvalidTransition(id, status),
        }
    }
}

/// Why a run ended in `failed`. Its display text becomes the job message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("{}", timeout_message(.budget, .buffer))]
    Timeout { budget: Duration, buffer: Duration },

    #[error("Recording failed: {0}")]
    Failure(String),

    #[error("{}", missing_artifacts_message(.0))]
    MissingArtifacts(Vec<PathBuf>),

    #[error("Recording failed unexpectedly: {0}")]
    Unexpected(String),
}

fn timeout_message(budget: &Duration, buffer: &Duration) -> String {
    format!(
        "Job timed out after {} ({} recording budget + {} buffer)",
        format_duration(*budget + *buffer),
        format_duration(*budget),
        format_duration(*buffer),
    )
}

fn missing_artifacts_message(missing: &[PathBuf]) -> String {
    if missing.is_empty() {
        return "Recording failed - automation reported success without any output files"
            .to_string();
    }
    let paths: Vec<String> = missing.iter().map(|p| p.display().to_string()).collect();
    format!("Recording failed - output files not found: {}", paths.join(", "))
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
