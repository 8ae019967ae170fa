// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tokio_util::sync::CancellationToken;

/// Supervisor-held reference to a live job's execution.
///
/// Lives in the registry next to the record it belongs to, from the moment
/// the job is scheduled until the moment it turns terminal. Cancelling it
/// wakes the job's supervisor, which stops the automation.
#[derive(Debug)]
pub struct ExecutionHandle {
    token: CancellationToken,
}

impl ExecutionHandle {
    pub(crate) fn new() -> Self {
        Self { token: CancellationToken::new() }
    }

    /// Token the supervisor watches.
    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
