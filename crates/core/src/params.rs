// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parameters of a recording request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Creation-time validation failure. Raised before any job exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

fn default_duration_minutes() -> u32 {
    15
}

fn default_max_wait_time_minutes() -> u32 {
    5
}

/// Everything the automation needs to join, record, and transcribe one meeting.
///
/// Passed by value to the automation for its job only; nothing here is ever
/// written to the daemon's own environment.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingParams {
    // Required fields default to empty so an omitted one reaches `validate`
    // and is reported by name instead of failing the decode.
    /// Meeting URL to join (the task target)
    #[serde(default)]
    pub meet_link: String,
    /// Account used to sign in
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// API key for the transcription service
    #[serde(default)]
    pub transcription_api_key: String,
    /// Recording length; the execution deadline is derived from it
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
    /// How long to wait in the lobby before giving up
    #[serde(default = "default_max_wait_time_minutes")]
    pub max_wait_time_minutes: u32,
    /// Ask the transcription service for speaker diarization
    #[serde(default)]
    pub diarization: bool,
    /// Display name shown to other participants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
}

impl RecordingParams {
    /// Check required fields are non-empty. Semantics (a reachable link, valid
    /// credentials) are the automation's business, not ours.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("meet_link", &self.meet_link),
            ("email", &self.email),
            ("password", &self.password),
            ("transcription_api_key", &self.transcription_api_key),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(name));
            }
        }
        Ok(())
    }

    /// The recording budget as a duration.
    pub fn duration_budget(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_minutes) * 60)
    }
}

// Secrets stay out of logs.
impl fmt::Debug for RecordingParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingParams")
            .field("meet_link", &self.meet_link)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("transcription_api_key", &"<redacted>")
            .field("duration_minutes", &self.duration_minutes)
            .field("max_wait_time_minutes", &self.max_wait_time_minutes)
            .field("diarization", &self.diarization)
            .field("custom_name", &self.custom_name)
            .finish()
    }
}

crate::builder! {
    pub struct RecordingParamsBuilder => RecordingParams {
        into {
            meet_link: String = "https://meet.example.com/abc-defg-hij",
            email: String = "bot@example.com",
            password: String = "hunter2",
            transcription_api_key: String = "tk-test",
        }
        set {
            duration_minutes: u32 = 1,
            max_wait_time_minutes: u32 = 1,
            diarization: bool = false,
        }
        option {
            custom_name: String = None,
        }
    }
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
