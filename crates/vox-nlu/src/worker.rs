//! Out-of-process engine adapter.
//!
//! Supervises an external trained-model worker reached over the
//! `vox-wire` framing on a local TCP socket. Lifecycle:
//!
//! ```text
//! Uninitialized → Building (exe absent) → Launching → AwaitingHandshake
//!       → Ready ⇄ AwaitingResponse (one call in flight) → Terminated
//! ```
//!
//! The worker connects back to an endpoint the adapter opens, so the
//! adapter binds first, launches second, and fails construction with
//! [`EngineError::StartupTimeout`] if the connection is not observed
//! within the bound.
//!
//! # Correlation
//!
//! There is no request-ID matching on this channel: responses are
//! matched purely by arrival order. The adapter therefore keeps at
//! most one response-bearing call outstanding, serializing callers on
//! the write-side mutex which is held across send and wait.

use crate::engine::{IntentEngine, IntentSpec};
use crate::EngineError;
use async_trait::async_trait;
use parking_lot::Mutex as SyncMutex;
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::process::Command;
use tokio::sync::{oneshot, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use vox_types::{to_snake, IntentId, IntentResult, Utterance};
use vox_wire::{read_message, write_frame, WorkerRequest};

/// One-time fetch-and-build recipe for a missing worker executable.
///
/// Opaque and retryable; not consulted when the executable exists.
#[derive(Debug, Clone)]
pub struct BuildStep {
    /// Repository to clone.
    pub repo_url: String,

    /// Branch to clone (single-branch).
    pub branch: String,

    /// Checkout directory.
    pub dir: PathBuf,

    /// Build script, run with `sh` inside `dir`.
    pub script: String,
}

/// Configuration for [`WorkerEngine`].
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Interface the adapter listens on for the worker's connection.
    pub host: String,

    /// Listen port; `0` picks an ephemeral port.
    pub port: u16,

    /// Root directory holding per-skill intent definition files.
    pub skills_dir: PathBuf,

    /// Locale subdirectory for intent files.
    pub lang: String,

    /// Bound on the worker's connect-back handshake.
    pub startup_timeout: Duration,

    /// Bound on each response-bearing RPC call.
    pub call_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8014,
            skills_dir: PathBuf::new(),
            lang: "en-us".to_string(),
            startup_timeout: Duration::from_secs(4),
            call_timeout: Duration::from_secs(4),
        }
    }
}

impl WorkerConfig {
    /// Path of the intent definition file for `(skill, stem)`:
    /// `<skills_dir>/<skill_snake>/vocab/<lang>/<stem>.intent`.
    #[must_use]
    pub fn intent_file(&self, skill: &str, stem: &str) -> PathBuf {
        self.skills_dir
            .join(to_snake(skill))
            .join("vocab")
            .join(&self.lang)
            .join(format!("{stem}.intent"))
    }
}

/// Handle to whatever the launcher started.
#[derive(Debug)]
pub enum WorkerHandle {
    /// A supervised child process.
    Process(tokio::process::Child),

    /// Something the adapter does not own (tests, externally managed
    /// workers).
    Detached,
}

impl WorkerHandle {
    fn start_kill(&mut self) {
        if let Self::Process(child) = self {
            if let Err(e) = child.start_kill() {
                warn!(error = %e, "failed to kill worker process");
            }
        }
    }
}

/// Seam for starting the worker once the adapter's endpoint is bound.
#[async_trait]
pub trait WorkerLauncher: Send + Sync {
    /// Start the worker pointed at `addr`. Must not wait for the
    /// worker to connect; the adapter bounds that wait itself.
    async fn launch(&self, addr: SocketAddr) -> Result<WorkerHandle, EngineError>;
}

/// Production launcher: builds the executable if absent, then spawns
/// it with the endpoint address as its argument.
pub struct ProcessLauncher {
    exe: PathBuf,
    build: Option<BuildStep>,
}

impl ProcessLauncher {
    pub fn new(exe: impl Into<PathBuf>, build: Option<BuildStep>) -> Self {
        Self {
            exe: exe.into(),
            build,
        }
    }

    async fn ensure_built(&self) -> Result<(), EngineError> {
        if self.exe.is_file() {
            return Ok(());
        }
        let Some(build) = &self.build else {
            return Err(EngineError::BuildFailed {
                reason: format!("worker executable missing: {}", self.exe.display()),
            });
        };

        if !build.dir.is_dir() {
            info!(url = %build.repo_url, "fetching worker sources");
            run_checked(
                Command::new("git")
                    .arg("clone")
                    .arg("-b")
                    .arg(&build.branch)
                    .arg("--single-branch")
                    .arg(&build.repo_url)
                    .arg(&build.dir),
                "git clone",
            )
            .await?;
        }

        info!(dir = %build.dir.display(), "building worker");
        run_checked(
            Command::new("sh")
                .arg(&build.script)
                .current_dir(&build.dir),
            "build script",
        )
        .await?;

        if !self.exe.is_file() {
            return Err(EngineError::BuildFailed {
                reason: format!("build produced no executable at {}", self.exe.display()),
            });
        }
        Ok(())
    }
}

async fn run_checked(command: &mut Command, what: &str) -> Result<(), EngineError> {
    let status = command
        .status()
        .await
        .map_err(|source| EngineError::SpawnFailed { source })?;
    if !status.success() {
        return Err(EngineError::BuildFailed {
            reason: format!("{what} exited with {status}"),
        });
    }
    Ok(())
}

#[async_trait]
impl WorkerLauncher for ProcessLauncher {
    async fn launch(&self, addr: SocketAddr) -> Result<WorkerHandle, EngineError> {
        self.ensure_built().await?;
        let child = Command::new(&self.exe)
            .arg(addr.to_string())
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::SpawnFailed { source })?;
        Ok(WorkerHandle::Process(child))
    }
}

/// Single in-flight response slot, filled by the reader task.
#[derive(Default)]
struct PendingReply {
    slot: SyncMutex<Option<Value>>,
    ready: Notify,
}

impl PendingReply {
    fn clear(&self) {
        *self.slot.lock() = None;
    }

    fn put(&self, value: Value) {
        *self.slot.lock() = Some(value);
        self.ready.notify_one();
    }

    /// Wait for the next deposited reply. Loops over notifications so
    /// a stale permit from an abandoned call cannot yield `None`.
    async fn wait(&self) -> Value {
        loop {
            if let Some(value) = self.slot.lock().take() {
                return value;
            }
            self.ready.notified().await;
        }
    }
}

/// Out-of-process engine adapter.
pub struct WorkerEngine {
    config: WorkerConfig,
    /// Write half; holding this lock across send+wait is what keeps
    /// calls strictly serialized.
    writer: Mutex<OwnedWriteHalf>,
    pending: Arc<PendingReply>,
    handle: SyncMutex<WorkerHandle>,
    reader_task: JoinHandle<()>,
}

impl WorkerEngine {
    /// Bind the RPC endpoint, launch the worker, and wait for its
    /// connection.
    ///
    /// # Errors
    ///
    /// [`EngineError::StartupTimeout`] when the worker does not
    /// connect within the configured bound; build and spawn failures
    /// propagate from the launcher. All are fatal: no half-started
    /// adapter is returned.
    pub async fn start(
        config: WorkerConfig,
        launcher: Arc<dyn WorkerLauncher>,
    ) -> Result<Self, EngineError> {
        let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
        let addr = listener.local_addr()?;
        debug!(%addr, "worker endpoint bound");

        let (conn_tx, conn_rx) = oneshot::channel();
        let accept_task = tokio::spawn(accept_one(listener, conn_tx));

        let mut handle = match launcher.launch(addr).await {
            Ok(handle) => handle,
            Err(e) => {
                accept_task.abort();
                return Err(e);
            }
        };

        let stream = match timeout(config.startup_timeout, conn_rx).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(_)) => {
                handle.start_kill();
                return Err(EngineError::ConnectionLost);
            }
            Err(_) => {
                handle.start_kill();
                accept_task.abort();
                return Err(EngineError::StartupTimeout {
                    timeout: config.startup_timeout,
                });
            }
        };
        info!(peer = %stream.peer_addr().map(|a| a.to_string()).unwrap_or_default(),
              "worker connected");

        let (read_half, write_half) = stream.into_split();
        let pending = Arc::new(PendingReply::default());
        let reader_task = tokio::spawn(read_loop(read_half, Arc::clone(&pending)));

        Ok(Self {
            config,
            writer: Mutex::new(write_half),
            pending,
            handle: SyncMutex::new(handle),
            reader_task,
        })
    }

    /// Send a fire-and-forget request; no response is awaited.
    async fn send(&self, request: &WorkerRequest) -> Result<(), EngineError> {
        let body = serde_json::to_vec(request).map_err(vox_wire::WireError::from)?;
        let mut writer = self.writer.lock().await;
        write_frame(&mut *writer, &body).await?;
        Ok(())
    }

    /// Send a request and wait for the next reply, bounded by the
    /// call timeout. The writer lock held across the wait serializes
    /// callers so at most one call is outstanding.
    async fn call(&self, request: &WorkerRequest) -> Result<Value, EngineError> {
        let body = serde_json::to_vec(request).map_err(vox_wire::WireError::from)?;
        let mut writer = self.writer.lock().await;

        self.pending.clear();
        write_frame(&mut *writer, &body).await?;

        match timeout(self.config.call_timeout, self.pending.wait()).await {
            Ok(value) => Ok(value),
            Err(_) => Err(EngineError::RpcTimeout {
                request: request.verb(),
                timeout: self.config.call_timeout,
            }),
        }
    }

    /// Tear down the worker: kill the process and stop the reader.
    pub fn shutdown(&self) {
        self.handle.lock().start_kill();
        self.reader_task.abort();
    }
}

impl Drop for WorkerEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn accept_one(listener: TcpListener, conn_tx: oneshot::Sender<TcpStream>) {
    match listener.accept().await {
        Ok((stream, peer)) => {
            debug!(%peer, "worker connection accepted");
            let _ = conn_tx.send(stream);
        }
        Err(e) => warn!(error = %e, "worker endpoint accept failed"),
    }
}

async fn read_loop(mut reader: OwnedReadHalf, pending: Arc<PendingReply>) {
    loop {
        match read_message(&mut reader).await {
            Ok(value) => pending.put(value),
            Err(vox_wire::WireError::ConnectionClosed) => {
                warn!("worker connection closed");
                break;
            }
            Err(e) => {
                warn!(error = %e, "worker channel read failed");
                break;
            }
        }
    }
}

#[async_trait]
impl IntentEngine for WorkerEngine {
    fn name(&self) -> &str {
        "worker"
    }

    /// Accepts a [`IntentSpec::FileStem`] whose definition file exists
    /// at the path derived from `(skill, stem)`. Absence is a silent
    /// rejection so the manager can try the next engine.
    async fn try_register_intent(&self, skill: &str, spec: &IntentSpec) -> Option<IntentId> {
        let IntentSpec::FileStem(stem) = spec else {
            return None;
        };
        if stem.is_empty() {
            return None;
        }
        let id = IntentId::new(skill, stem.clone()).ok()?;

        let file = self.config.intent_file(skill, stem);
        if !file.is_file() {
            return None;
        }

        let request = WorkerRequest::RegisterIntent {
            name: id.to_string(),
            file_name: file.display().to_string(),
        };
        if let Err(e) = self.send(&request).await {
            warn!(intent = %id, error = %e, "failed to send intent registration");
            return None;
        }
        debug!(intent = %id, file = %file.display(), "registered worker intent");
        Some(id)
    }

    /// The worker compiles its model once all registrations are in.
    async fn on_intents_loaded(&self) -> Result<(), EngineError> {
        self.send(&WorkerRequest::Train).await
    }

    async fn calc_intents(
        &self,
        utterance: &Utterance,
    ) -> Result<HashMap<String, IntentResult>, EngineError> {
        let reply = self
            .call(&WorkerRequest::CalcIntents {
                query: utterance.text.clone(),
            })
            .await?;

        let mut results: HashMap<String, IntentResult> =
            serde_json::from_value(reply).map_err(|e| EngineError::BadReply {
                reason: e.to_string(),
            })?;

        for (name, result) in results.iter_mut() {
            if result.name.is_empty() {
                result.name = name.clone();
            }
            if result.utterance.is_empty() {
                result.utterance = utterance.text.clone();
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn intent_file_path_derivation() {
        let config = WorkerConfig {
            skills_dir: PathBuf::from("/home/user/.vox/skills"),
            ..WorkerConfig::default()
        };
        assert_eq!(
            config.intent_file("TimeSkill", "time.ask"),
            Path::new("/home/user/.vox/skills/time_skill/vocab/en-us/time.ask.intent")
        );
    }

    #[test]
    fn default_bounds_are_four_seconds() {
        let config = WorkerConfig::default();
        assert_eq!(config.startup_timeout, Duration::from_secs(4));
        assert_eq!(config.call_timeout, Duration::from_secs(4));
    }
}
