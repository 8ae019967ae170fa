// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request deserialization: optional fields and defaults.

use super::*;

#[test]
fn delete_job_purge_defaults_to_false() {
    let json = r#"{"type":"DeleteJob","id":"job-abc"}"#;
    let decoded: Request = serde_json::from_str(json).expect("deserialize failed");
    assert_eq!(decoded, Request::DeleteJob { id: "job-abc".to_string(), purge: false });
}

#[test]
fn create_job_fills_param_defaults() {
    let json = r#"{
        "type": "CreateJob",
        "params": {
            "meet_link": "https://meet.example.com/abc",
            "email": "bot@example.com",
            "password": "pw",
            "transcription_api_key": "key"
        }
    }"#;
    let decoded: Request = serde_json::from_str(json).expect("deserialize failed");
    match decoded {
        Request::CreateJob { params } => {
            assert_eq!(params.duration_minutes, 15);
            assert_eq!(params.max_wait_time_minutes, 5);
            assert!(!params.diarization);
            assert!(params.custom_name.is_none());
        }
        other => panic!("Expected CreateJob request, got {:?}", other),
    }
}

#[test]
fn empty_required_fields_still_decode() {
    // Empty strings decode; rejecting them is validation's job.
    let json = r#"{"type":"CreateJob","params":{"meet_link":"","email":"","password":"","transcription_api_key":""}}"#;
    let decoded: Request = serde_json::from_str(json).expect("deserialize failed");
    assert!(matches!(decoded, Request::CreateJob { .. }));
}

#[test]
fn debug_output_redacts_secrets() {
    let request = Request::CreateJob {
        params: RecordingParams::builder().password("s3cret").transcription_api_key("tk-live").build(),
    };
    let debug = format!("{:?}", request);
    assert!(!debug.contains("s3cret"));
    assert!(!debug.contains("tk-live"));
}
