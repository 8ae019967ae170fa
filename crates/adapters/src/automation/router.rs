// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Picks the recorder backend once at startup.

use super::{Automation, AutomationError, CommandAutomation, ExecutionRequest, SimulatedAutomation};
use async_trait::async_trait;
use mb_core::Outcome;
use tokio_util::sync::CancellationToken;

/// Either the external recorder process or the simulated stand-in.
#[derive(Debug, Clone)]
pub enum RecorderRouter {
    Command(CommandAutomation),
    Simulated(SimulatedAutomation),
}

impl RecorderRouter {
    /// Short backend name for logs and health responses.
    pub fn kind(&self) -> &'static str {
        match self {
            RecorderRouter::Command(_) => "command",
            RecorderRouter::Simulated(_) => "simulated",
        }
    }
}

impl From<CommandAutomation> for RecorderRouter {
    fn from(automation: CommandAutomation) -> Self {
        RecorderRouter::Command(automation)
    }
}

impl From<SimulatedAutomation> for RecorderRouter {
    fn from(automation: SimulatedAutomation) -> Self {
        RecorderRouter::Simulated(automation)
    }
}

#[async_trait]
impl Automation for RecorderRouter {
    async fn execute(
        &self,
        request: ExecutionRequest,
        cancel: CancellationToken,
    ) -> Result<Outcome, AutomationError> {
        match self {
            RecorderRouter::Command(inner) => inner.execute(request, cancel).await,
            RecorderRouter::Simulated(inner) => inner.execute(request, cancel).await,
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
