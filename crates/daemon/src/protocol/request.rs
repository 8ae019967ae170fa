// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mb_core::RecordingParams;
use serde::{Deserialize, Serialize};

/// Request from a client to the daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Create a recording job and schedule it
    CreateJob { params: RecordingParams },

    /// Fetch one job
    GetJob { id: String },

    /// All jobs (expired ones are swept first)
    ListJobs,

    /// Cancel a live job
    CancelJob { id: String },

    /// Remove a job, cancelling it first if it is live
    DeleteJob {
        id: String,
        /// Also remove its artifact files
        #[serde(default)]
        purge: bool,
    },

    /// Aggregate counts (expired jobs are swept first)
    Stats,

    /// Run a retention sweep now
    Sweep,

    /// Cancel every live job and stop the daemon
    Shutdown,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
