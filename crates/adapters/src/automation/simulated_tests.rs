// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mb_core::{JobId, RecordingParams};
use tempfile::tempdir;

fn request(job_id: &str) -> ExecutionRequest {
    ExecutionRequest {
        job_id: JobId::from_string(job_id),
        params: RecordingParams::builder().build(),
    }
}

#[tokio::test(start_paused = true)]
async fn writes_placeholders_after_delay() {
    let dir = tempdir().unwrap();
    let automation = SimulatedAutomation::new(Duration::from_secs(2), dir.path());

    let outcome = automation.execute(request("job-s"), CancellationToken::new()).await.unwrap();

    let Outcome::Success { artifact_paths } = outcome else {
        panic!("expected success");
    };
    assert_eq!(artifact_paths.len(), 2);
    assert!(artifact_paths.iter().all(|p| p.exists()));

    let transcript = std::fs::read_to_string(dir.path().join("job-s").join(TRANSCRIPT_FILE)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&transcript).unwrap();
    assert_eq!(value["simulated"], true);
}

#[tokio::test(start_paused = true)]
async fn cancel_before_delay_writes_nothing() {
    let dir = tempdir().unwrap();
    let automation = SimulatedAutomation::new(Duration::from_secs(60), dir.path());
    let token = CancellationToken::new();
    token.cancel();

    let outcome = automation.execute(request("job-t"), token).await.unwrap();

    assert!(matches!(outcome, Outcome::Failure { .. }));
    assert!(!dir.path().join("job-t").exists());
}
