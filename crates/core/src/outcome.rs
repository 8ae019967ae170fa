// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What the automation reports when it returns normally.
///
/// `Success` is a claim, not a verdict: the supervisor still checks the
/// declared artifacts exist before marking the job completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Success { artifact_paths: Vec<PathBuf> },
    Failure { reason: String },
}

impl Outcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        Outcome::Failure { reason: reason.into() }
    }
}
