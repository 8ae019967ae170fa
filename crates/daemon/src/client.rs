// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client for the daemon socket.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mb_core::{JobId, JobRecord, RecordingParams};
use mb_engine::JobStats;
use thiserror::Error;
use tokio::net::UnixStream;

use crate::protocol::{self, ErrorKind, ProtocolError, Request, Response};

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not connect to daemon at {path}: {source}")]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The daemon answered with an error
    #[error("{message}")]
    Rejected { kind: ErrorKind, message: String },

    #[error("unexpected response: {0:?}")]
    UnexpectedResponse(Box<Response>),
}

/// One connection per request, like the daemon expects.
#[derive(Debug, Clone)]
pub struct DaemonClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl DaemonClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self { socket_path: socket_path.into(), timeout: crate::env::ipc_timeout() }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send a request and return the daemon's response verbatim.
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await.map_err(|source| {
            ClientError::Connect { path: self.socket_path.clone(), source }
        })?;
        let (mut reader, mut writer) = stream.into_split();
        protocol::write_request(&mut writer, request, self.timeout).await?;
        Ok(protocol::read_response(&mut reader, self.timeout).await?)
    }

    fn reject<T>(response: Response) -> Result<T, ClientError> {
        match response {
            Response::Error { kind, message } => Err(ClientError::Rejected { kind, message }),
            other => Err(ClientError::UnexpectedResponse(Box::new(other))),
        }
    }

    /// Health check; returns uptime in seconds
    pub async fn ping(&self) -> Result<u64, ClientError> {
        match self.send(&Request::Ping).await? {
            Response::Pong { uptime_secs, .. } => Ok(uptime_secs),
            other => Self::reject(other),
        }
    }

    pub async fn create_job(&self, params: RecordingParams) -> Result<JobRecord, ClientError> {
        match self.send(&Request::CreateJob { params }).await? {
            Response::Job { job } => Ok(job),
            other => Self::reject(other),
        }
    }

    pub async fn get_job(&self, id: &str) -> Result<JobRecord, ClientError> {
        match self.send(&Request::GetJob { id: id.to_string() }).await? {
            Response::Job { job } => Ok(job),
            other => Self::reject(other),
        }
    }

    pub async fn list_jobs(&self) -> Result<Vec<JobRecord>, ClientError> {
        match self.send(&Request::ListJobs).await? {
            Response::Jobs { jobs } => Ok(jobs),
            other => Self::reject(other),
        }
    }

    pub async fn cancel_job(&self, id: &str) -> Result<JobRecord, ClientError> {
        match self.send(&Request::CancelJob { id: id.to_string() }).await? {
            Response::Job { job } => Ok(job),
            other => Self::reject(other),
        }
    }

    /// Delete a job; returns whether it was cancelled first and what was purged
    pub async fn delete_job(
        &self,
        id: &str,
        purge: bool,
    ) -> Result<(bool, Vec<PathBuf>), ClientError> {
        match self.send(&Request::DeleteJob { id: id.to_string(), purge }).await? {
            Response::Deleted { cancelled, purged, .. } => Ok((cancelled, purged)),
            other => Self::reject(other),
        }
    }

    pub async fn stats(&self) -> Result<JobStats, ClientError> {
        match self.send(&Request::Stats).await? {
            Response::Stats { stats, .. } => Ok(stats),
            other => Self::reject(other),
        }
    }

    pub async fn sweep(&self) -> Result<Vec<JobId>, ClientError> {
        match self.send(&Request::Sweep).await? {
            Response::Swept { removed } => Ok(removed),
            other => Self::reject(other),
        }
    }

    /// Request daemon shutdown
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(&Request::Shutdown).await? {
            Response::ShuttingDown => Ok(()),
            other => Self::reject(other),
        }
    }
}
