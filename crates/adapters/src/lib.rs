// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mb-adapters: Adapters for the external recording automation

pub mod automation;

pub use automation::{
    expected_artifacts, job_output_dir, Automation, AutomationError, CommandAutomation,
    ExecutionRequest, RecorderRouter, SimulatedAutomation, TRANSCRIPT_FILE, VIDEO_FILE,
};

#[cfg(any(test, feature = "test-support"))]
pub use automation::{FakeAutomation, FakeBehavior};
