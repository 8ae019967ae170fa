// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness: an in-process daemon on a temp socket, driven through
//! the real client.

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use mb_core::{JobRecord, JobStatus, RecordingParams};
pub use mb_daemon::lifecycle::RecorderConfig;
pub use mb_daemon::{ClientError, Config, DaemonClient, ErrorKind};
pub use std::time::Duration;

use mb_daemon::{startup, DaemonState, ListenCtx, Listener, StartupResult};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Stand-in recorder. Behaves according to `MB_CUSTOM_NAME`.
const RECORDER_SCRIPT: &str = r#"
case "$MB_CUSTOM_NAME" in
  hang) exec sleep 30 ;;
  empty) exit 0 ;;
  fail) echo "could not join meeting" >&2; exit 2 ;;
  *) touch output.mp4 transcript.json ;;
esac
"#;

pub struct TestDaemon {
    pub client: DaemonClient,
    pub config: Config,
    daemon: DaemonState,
    shutdown: CancellationToken,
    listener_task: JoinHandle<()>,
    _dir: TempDir,
}

impl TestDaemon {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start with the script recorder, after letting `configure` adjust the config.
    pub async fn start_with(configure: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("recorder.sh");
        std::fs::write(&script, RECORDER_SCRIPT).unwrap();

        let mut config = Config::for_state_dir(dir.path().join("state"));
        config.recorder = RecorderConfig::Command {
            program: PathBuf::from("/bin/sh"),
            args: vec![script.display().to_string()],
        };
        config.supervisor.cancel_grace = Duration::from_secs(2);
        configure(&mut config);

        let StartupResult { daemon, listener } = startup(&config).await.unwrap();
        let shutdown = CancellationToken::new();
        let ctx = Arc::new(ListenCtx::new(&daemon, shutdown.clone()));
        let listener_task = tokio::spawn(Listener::new(listener, ctx).run());
        let client = DaemonClient::new(&config.socket_path).with_timeout(Duration::from_secs(5));

        Self { client, config, daemon, shutdown, listener_task, _dir: dir }
    }

    pub fn recordings_dir(&self) -> &Path {
        &self.config.recordings_dir
    }

    /// Poll until the job satisfies `done`, failing after ten seconds.
    pub async fn wait_for(&self, id: &str, done: impl Fn(&JobRecord) -> bool) -> JobRecord {
        for _ in 0..200 {
            let job = self.client.get_job(id).await.unwrap();
            if done(&job) {
                return job;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("job {} did not reach the expected state", id);
    }

    pub async fn wait_terminal(&self, id: &str) -> JobRecord {
        self.wait_for(id, JobRecord::is_terminal).await
    }

    /// Wait for the daemon to stop after a client `Shutdown` request.
    pub async fn wait_stopped(self) -> Vec<JobRecord> {
        self.shutdown.cancelled().await;
        self.daemon.shutdown().await.unwrap();
        self.listener_task.await.unwrap();
        self.daemon.service.registry().list()
    }

    pub async fn stop(self) {
        self.shutdown.cancel();
        self.daemon.shutdown().await.unwrap();
        self.listener_task.await.unwrap();
    }
}

/// Valid params; `mode` picks the script recorder's behavior.
pub fn params(mode: &str) -> RecordingParams {
    RecordingParams {
        meet_link: "https://meet.example.com/abc-defg-hij".to_string(),
        email: "bot@example.com".to_string(),
        password: "hunter2".to_string(),
        transcription_api_key: "tk-test".to_string(),
        duration_minutes: 1,
        max_wait_time_minutes: 1,
        diarization: false,
        custom_name: Some(mode.to_string()),
    }
}
