// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mb-engine: Job orchestration for the meeting recorder bot
//!
//! All state is process-local. Nothing here survives a restart.

mod error;
mod handle;
mod registry;
mod retention;
mod service;
mod supervisor;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use error::{ExecutionError, JobError};
pub use handle::ExecutionHandle;
pub use registry::JobRegistry;
pub use retention::{RetentionSweeper, DEFAULT_MAX_AGE};
pub use service::{Deletion, JobService, JobStats};
pub use supervisor::{ExecutionSupervisor, SupervisorConfig};
