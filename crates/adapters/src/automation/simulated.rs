// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stand-in automation for development without a recorder.

use super::{
    expected_artifacts, job_output_dir, Automation, AutomationError, ExecutionRequest,
    TRANSCRIPT_FILE, VIDEO_FILE,
};
use async_trait::async_trait;
use mb_core::Outcome;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Waits a fixed delay, then writes placeholder artifacts and reports success.
///
/// The placeholders are real files, so jobs run through the same artifact
/// check as with the real recorder.
#[derive(Debug, Clone)]
pub struct SimulatedAutomation {
    delay: Duration,
    recordings_dir: PathBuf,
}

impl SimulatedAutomation {
    pub fn new(delay: Duration, recordings_dir: impl Into<PathBuf>) -> Self {
        Self { delay, recordings_dir: recordings_dir.into() }
    }
}

#[async_trait]
impl Automation for SimulatedAutomation {
    async fn execute(
        &self,
        request: ExecutionRequest,
        cancel: CancellationToken,
    ) -> Result<Outcome, AutomationError> {
        tokio::select! {
            _ = tokio::time::sleep(self.delay) => {}
            _ = cancel.cancelled() => return Ok(Outcome::failure("simulated recording cancelled")),
        }

        let output_dir = job_output_dir(&self.recordings_dir, &request.job_id);
        tokio::fs::create_dir_all(&output_dir).await?;
        tokio::fs::write(output_dir.join(VIDEO_FILE), b"").await?;
        let transcript = serde_json::json!({
            "simulated": true,
            "meet_link": request.params.meet_link,
            "duration_minutes": request.params.duration_minutes,
            "diarization": request.params.diarization,
            "utterances": [],
        });
        tokio::fs::write(output_dir.join(TRANSCRIPT_FILE), transcript.to_string()).await?;

        tracing::info!(job_id = %request.job_id, dir = %output_dir.display(), "simulated recording written");
        Ok(Outcome::Success { artifact_paths: expected_artifacts(&output_dir) })
    }
}

#[cfg(test)]
#[path = "simulated_tests.rs"]
mod tests;
