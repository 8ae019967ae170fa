// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for the job state machine.
pub mod strategies {
    use proptest::prelude::*;

    /// A transition request that may or may not be legal for a given record.
    #[derive(Debug, Clone)]
    pub enum Transition {
        Start,
        Complete(u64),
        Fail(u64),
        Cancel(u64),
    }

    pub fn arb_transition() -> impl Strategy<Value = Transition> {
        prop_oneof![
            Just(Transition::Start),
            (0u64..10_000).prop_map(Transition::Complete),
            (0u64..10_000).prop_map(Transition::Fail),
            (0u64..10_000).prop_map(Transition::Cancel),
        ]
    }
}

use crate::{JobId, JobRecord};

/// A `starting` record created at `created_at_ms`.
pub fn starting_job(created_at_ms: u64) -> JobRecord {
    JobRecord::new(JobId::new(), created_at_ms)
}

/// A record that completed `completed_at_ms`, created one minute earlier.
pub fn completed_job(completed_at_ms: u64) -> JobRecord {
    let mut job = starting_job(completed_at_ms.saturating_sub(60_000));
    let _ = job.start("Joining meeting...");
    let _ = job.complete(Vec::new(), "Recording completed successfully", completed_at_ms);
    job
}
