// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! Accepts connections on the Unix socket and serves one request per
//! connection. Handlers only touch the job service, which never blocks on a
//! running recording, so a slow job cannot stall the listener.

mod jobs;

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::env::{ipc_timeout, PROTOCOL_VERSION};
use crate::lifecycle::{DaemonService, DaemonState};
use crate::protocol::{self, ErrorKind, Request, Response};

/// Shared daemon context for all request handlers.
pub struct ListenCtx {
    pub service: DaemonService,
    pub start_time: Instant,
    pub recorder_kind: &'static str,
    /// Cancelled when a client asks the daemon to stop
    pub shutdown: CancellationToken,
}

impl ListenCtx {
    pub fn new(daemon: &DaemonState, shutdown: CancellationToken) -> Self {
        Self {
            service: daemon.service.clone(),
            start_time: daemon.start_time,
            recorder_kind: daemon.recorder_kind,
            shutdown,
        }
    }

    fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Listener task for accepting socket connections.
pub struct Listener {
    unix: UnixListener,
    ctx: Arc<ListenCtx>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub(crate) enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),
}

impl Listener {
    pub fn new(unix: UnixListener, ctx: Arc<ListenCtx>) -> Self {
        Self { unix, ctx }
    }

    /// Run the accept loop until the shutdown token fires, spawning a task
    /// per connection.
    pub async fn run(self) {
        loop {
            tokio::select! {
                result = self.unix.accept() => match result {
                    Ok((stream, _)) => {
                        let ctx = Arc::clone(&self.ctx);
                        tokio::spawn(async move {
                            let (reader, writer) = stream.into_split();
                            if let Err(e) = handle_connection(reader, writer, &ctx).await {
                                log_connection_error(e);
                            }
                        });
                    }
                    Err(e) => error!("Unix accept error: {}", e),
                },
                _ = self.ctx.shutdown.cancelled() => {
                    debug!("listener stopping");
                    return;
                }
            }
        }
    }
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(protocol::ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected")
        }
        ConnectionError::Protocol(protocol::ProtocolError::Timeout) => {
            warn!("Connection timeout")
        }
        _ => error!("Connection error: {}", e),
    }
}

/// Handle a single client connection: read one request, answer it.
///
/// Generic over reader/writer types so tests can drive it over in-memory pipes.
pub(crate) async fn handle_connection<R, W>(
    mut reader: R,
    mut writer: W,
    ctx: &ListenCtx,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let request = match protocol::read_request(&mut reader, ipc_timeout()).await {
        Ok(request) => request,
        Err(protocol::ProtocolError::Json(e)) => {
            warn!(error = %e, "rejecting undecodable request");
            let response =
                Response::Error { kind: ErrorKind::InvalidRequest, message: format!("invalid request: {}", e) };
            protocol::write_response(&mut writer, &response, ipc_timeout()).await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    // Polling requests at debug, everything else at info
    if matches!(request, Request::Ping | Request::GetJob { .. } | Request::ListJobs | Request::Stats)
    {
        debug!(request = ?request, "received query");
    } else {
        info!(request = ?request, "received request");
    }

    let response = handle_request(request, ctx);
    debug!("Sending response: {:?}", response);

    protocol::write_response(&mut writer, &response, ipc_timeout()).await?;
    Ok(())
}

/// Dispatch one request to the job service.
pub(crate) fn handle_request(request: Request, ctx: &ListenCtx) -> Response {
    match request {
        Request::Ping => Response::Pong {
            version: PROTOCOL_VERSION.to_string(),
            uptime_secs: ctx.uptime_secs(),
            recorder: ctx.recorder_kind.to_string(),
            persistent: false,
        },
        Request::CreateJob { params } => jobs::handle_create(ctx, params),
        Request::GetJob { id } => jobs::handle_get(ctx, &id),
        Request::ListJobs => Response::Jobs { jobs: ctx.service.list_jobs() },
        Request::CancelJob { id } => jobs::handle_cancel(ctx, &id),
        Request::DeleteJob { id, purge } => jobs::handle_delete(ctx, &id, purge),
        Request::Stats => Response::Stats {
            stats: ctx.service.stats(),
            uptime_secs: ctx.uptime_secs(),
            persistent: false,
        },
        Request::Sweep => Response::Swept { removed: ctx.service.sweep() },
        Request::Shutdown => {
            info!("shutdown requested by client");
            ctx.shutdown.cancel();
            Response::ShuttingDown
        }
    }
}

#[cfg(test)]
#[path = "../listener_tests.rs"]
mod tests;
