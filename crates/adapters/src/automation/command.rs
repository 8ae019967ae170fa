// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Automation backed by an external recorder program.

use super::{expected_artifacts, job_output_dir, Automation, AutomationError, ExecutionRequest};
use async_trait::async_trait;
use mb_core::{Outcome, RecordingParams};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

/// Longest stderr excerpt carried into a failure reason.
const STDERR_TAIL_BYTES: usize = 500;

/// Runs the recorder as a child process, one per job.
///
/// Parameters reach the child through its own environment (`MB_*`
/// variables) and it runs inside the job's output directory. Exit status 0
/// is reported as success with the expected artifacts; the supervisor then
/// checks they really exist. The child is killed when cancelled.
#[derive(Debug, Clone)]
pub struct CommandAutomation {
    program: PathBuf,
    args: Vec<String>,
    recordings_dir: PathBuf,
}

impl CommandAutomation {
    pub fn new(program: impl Into<PathBuf>, recordings_dir: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new(), recordings_dir: recordings_dir.into() }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn recordings_dir(&self) -> &Path {
        &self.recordings_dir
    }
}

/// Environment handed to the recorder child.
pub(crate) fn recorder_env(params: &RecordingParams, output_dir: &Path) -> Vec<(&'static str, String)> {
    let mut env = vec![
        ("MB_MEET_LINK", params.meet_link.clone()),
        ("MB_EMAIL", params.email.clone()),
        ("MB_PASSWORD", params.password.clone()),
        ("MB_TRANSCRIPTION_API_KEY", params.transcription_api_key.clone()),
        ("MB_DURATION_MINUTES", params.duration_minutes.to_string()),
        ("MB_MAX_WAIT_MINUTES", params.max_wait_time_minutes.to_string()),
        ("MB_DIARIZATION", params.diarization.to_string()),
        ("MB_OUTPUT_DIR", output_dir.display().to_string()),
    ];
    if let Some(name) = &params.custom_name {
        env.push(("MB_CUSTOM_NAME", name.clone()));
    }
    env
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    let start = text.len().saturating_sub(STDERR_TAIL_BYTES);
    let start = (start..text.len()).find(|&i| text.is_char_boundary(i)).unwrap_or(text.len());
    text[start..].to_string()
}

#[async_trait]
impl Automation for CommandAutomation {
    async fn execute(
        &self,
        request: ExecutionRequest,
        cancel: CancellationToken,
    ) -> Result<Outcome, AutomationError> {
        let output_dir = job_output_dir(&self.recordings_dir, &request.job_id);
        tokio::fs::create_dir_all(&output_dir).await?;

        let child = Command::new(&self.program)
            .args(&self.args)
            .envs(recorder_env(&request.params, &output_dir))
            .current_dir(&output_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| AutomationError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        tracing::info!(
            job_id = %request.job_id,
            program = %self.program.display(),
            pid = ?child.id(),
            "recorder started"
        );

        // Dropping the wait future drops the child, which kills it.
        let output = tokio::select! {
            output = child.wait_with_output() => output?,
            _ = cancel.cancelled() => {
                tracing::info!(job_id = %request.job_id, "recorder killed on cancel");
                return Ok(Outcome::failure("recorder stopped by cancellation"));
            }
        };

        if output.status.success() {
            tracing::info!(job_id = %request.job_id, "recorder exited cleanly");
            return Ok(Outcome::Success { artifact_paths: expected_artifacts(&output_dir) });
        }

        let tail = stderr_tail(&output.stderr);
        tracing::warn!(job_id = %request.job_id, status = %output.status, stderr = %tail, "recorder failed");
        let reason = if tail.is_empty() {
            format!("recorder exited with {}", output.status)
        } else {
            format!("recorder exited with {}: {}", output.status, tail)
        };
        Ok(Outcome::Failure { reason })
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
