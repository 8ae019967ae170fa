// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job request handlers.

use mb_core::RecordingParams;
use mb_engine::JobError;
use tracing::{debug, warn};

use super::ListenCtx;
use crate::protocol::Response;

pub(super) fn handle_create(ctx: &ListenCtx, params: RecordingParams) -> Response {
    match ctx.service.create_job(params) {
        Ok(job) => Response::Job { job },
        Err(e) => {
            warn!(error = %e, "rejected job");
            e.into()
        }
    }
}

pub(super) fn handle_get(ctx: &ListenCtx, id: &str) -> Response {
    match ctx.service.get_job(id) {
        Ok(job) => Response::Job { job },
        Err(e) => e.into(),
    }
}

pub(super) fn handle_cancel(ctx: &ListenCtx, id: &str) -> Response {
    match ctx.service.cancel_job(id) {
        Ok(job) => Response::Job { job },
        Err(e @ (JobError::NotFound(_) | JobError::AlreadyTerminal(..))) => {
            debug!(job_id = id, error = %e, "cancel was a no-op");
            e.into()
        }
        Err(e) => e.into(),
    }
}

pub(super) fn handle_delete(ctx: &ListenCtx, id: &str, purge: bool) -> Response {
    match ctx.service.delete_job(id, purge) {
        Ok(deletion) => Response::Deleted {
            id: deletion.record.id().clone(),
            cancelled: deletion.cancelled,
            purged: deletion.purged,
        },
        Err(e) => e.into(),
    }
}
