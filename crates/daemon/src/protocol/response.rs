// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use mb_core::{JobId, JobRecord};
use mb_engine::{JobError, JobStats};
use serde::{Deserialize, Serialize};

/// Category of a failed request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    AlreadyTerminal,
    Validation,
    /// The request frame could not be decoded
    InvalidRequest,
    Internal,
}

impl From<&JobError> for ErrorKind {
    fn from(e: &JobError) -> Self {
        match e {
            JobError::NotFound(_) => ErrorKind::NotFound,
            JobError::AlreadyTerminal(..) => ErrorKind::AlreadyTerminal,
            JobError::Validation(_) => ErrorKind::Validation,
            JobError::InvalidTransition(..) | JobError::IdCollision(_) => ErrorKind::Internal,
        }
    }
}

/// Response from the daemon to a client.
///
/// Job state lives only in the daemon's memory; `persistent` is always
/// false and a restart forgets every job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Health check response
    Pong { version: String, uptime_secs: u64, recorder: String, persistent: bool },

    /// A single job
    Job { job: JobRecord },

    /// List of jobs in creation order
    Jobs { jobs: Vec<JobRecord> },

    /// Job removed
    Deleted {
        id: JobId,
        /// The job was live and got cancelled first
        cancelled: bool,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        purged: Vec<PathBuf>,
    },

    /// Aggregate counts
    Stats { stats: JobStats, uptime_secs: u64, persistent: bool },

    /// Jobs removed by a sweep
    Swept { removed: Vec<JobId> },

    /// Daemon is shutting down
    ShuttingDown,

    /// Error response
    Error { kind: ErrorKind, message: String },
}

impl From<JobError> for Response {
    fn from(e: JobError) -> Self {
        Response::Error { kind: ErrorKind::from(&e), message: e.to_string() }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
