// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mb-core: Core types for the meeting recorder bot (mb)

pub mod macros;

pub mod clock;
pub mod id;
pub mod job;
pub mod outcome;
pub mod params;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use job::{JobId, JobRecord, JobStatus, TransitionError};
pub use outcome::Outcome;
#[cfg(any(test, feature = "test-support"))]
pub use params::RecordingParamsBuilder;
pub use params::{RecordingParams, ValidationError};
pub use time_fmt::format_duration;
