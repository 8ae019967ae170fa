// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The recording automation: join a meeting, record it, transcribe it.
//!
//! The engine treats this as one opaque, expensive, non-idempotent call. It
//! is run once per job under a deadline and may be asked to stop through a
//! [`CancellationToken`]. Stopping is cooperative; an implementation that
//! ignores the token is eventually abandoned by the supervisor.

mod command;
mod router;
mod simulated;

pub use command::CommandAutomation;
pub use router::RecorderRouter;
pub use simulated::SimulatedAutomation;

use async_trait::async_trait;
use mb_core::{JobId, Outcome, RecordingParams};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Recording file written into the job's output directory.
pub const VIDEO_FILE: &str = "output.mp4";
/// Transcript file written into the job's output directory.
pub const TRANSCRIPT_FILE: &str = "transcript.json";

/// Errors escaping the automation (as opposed to a reported failure).
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything handed to one automation run.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub job_id: JobId,
    pub params: RecordingParams,
}

/// Adapter for the recording automation
#[async_trait]
pub trait Automation: Clone + Send + Sync + 'static {
    /// Run the automation once. Should return promptly after `cancel` fires.
    async fn execute(
        &self,
        request: ExecutionRequest,
        cancel: CancellationToken,
    ) -> Result<Outcome, AutomationError>;
}

/// Per-job output directory under the recordings root.
pub fn job_output_dir(recordings_dir: &Path, job_id: &JobId) -> PathBuf {
    recordings_dir.join(job_id.as_str())
}

/// The artifacts a successful run leaves in `output_dir`.
pub fn expected_artifacts(output_dir: &Path) -> Vec<PathBuf> {
    vec![output_dir.join(VIDEO_FILE), output_dir.join(TRANSCRIPT_FILE)]
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::panic)]
mod fake {
    use super::{Automation, AutomationError, ExecutionRequest};
    use async_trait::async_trait;
    use mb_core::Outcome;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio_util::sync::CancellationToken;

    /// Scripted behavior for one call
    #[derive(Debug, Clone)]
    pub enum FakeBehavior {
        /// Return the outcome immediately
        Return(Outcome),
        /// Return the outcome after a delay, unless cancelled first
        Delay(Duration, Outcome),
        /// Return an `AutomationError`
        Error(String),
        /// Run until cancelled, then report failure
        Hang,
        /// Never return and never look at the token
        HangIgnoringCancel,
        /// Panic inside the automation task
        Panic,
    }

    struct FakeState {
        script: VecDeque<FakeBehavior>,
        fallback: FakeBehavior,
        calls: Vec<ExecutionRequest>,
        cancelled: usize,
    }

    /// Fake automation for testing
    #[derive(Clone)]
    pub struct FakeAutomation {
        inner: Arc<Mutex<FakeState>>,
        called: Arc<Notify>,
    }

    impl Default for FakeAutomation {
        fn default() -> Self {
            Self::new(FakeBehavior::Hang)
        }
    }

    impl FakeAutomation {
        /// Every call behaves as `fallback` unless a scripted behavior is queued.
        pub fn new(fallback: FakeBehavior) -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeState {
                    script: VecDeque::new(),
                    fallback,
                    calls: Vec::new(),
                    cancelled: 0,
                })),
                called: Arc::new(Notify::new()),
            }
        }

        /// Queue a behavior for the next unscripted call
        pub fn push(&self, behavior: FakeBehavior) {
            self.inner.lock().script.push_back(behavior);
        }

        /// Get all recorded calls
        pub fn calls(&self) -> Vec<ExecutionRequest> {
            self.inner.lock().calls.clone()
        }

        /// Number of calls that observed cancellation
        pub fn cancelled_count(&self) -> usize {
            self.inner.lock().cancelled
        }

        /// Wait until at least `n` calls have been made
        pub async fn wait_for_calls(&self, n: usize) {
            loop {
                let notified = self.called.notified();
                if self.inner.lock().calls.len() >= n {
                    return;
                }
                notified.await;
            }
        }
    }

    #[async_trait]
    impl Automation for FakeAutomation {
        async fn execute(
            &self,
            request: ExecutionRequest,
            cancel: CancellationToken,
        ) -> Result<Outcome, AutomationError> {
            let behavior = {
                let mut state = self.inner.lock();
                state.calls.push(request);
                state.script.pop_front().unwrap_or_else(|| state.fallback.clone())
            };
            self.called.notify_waiters();

            match behavior {
                FakeBehavior::Return(outcome) => Ok(outcome),
                FakeBehavior::Delay(delay, outcome) => {
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => Ok(outcome),
                        _ = cancel.cancelled() => {
                            self.inner.lock().cancelled += 1;
                            Ok(Outcome::failure("cancelled"))
                        }
                    }
                }
                FakeBehavior::Error(message) => {
                    Err(AutomationError::Io(std::io::Error::other(message)))
                }
                FakeBehavior::Hang => {
                    cancel.cancelled().await;
                    self.inner.lock().cancelled += 1;
                    Ok(Outcome::failure("cancelled"))
                }
                FakeBehavior::HangIgnoringCancel => std::future::pending().await,
                FakeBehavior::Panic => panic!("fake automation panicked"),
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeAutomation, FakeBehavior};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
