//! Engine adapter error types.

use std::time::Duration;
use thiserror::Error;
use vox_wire::WireError;

/// Errors from engine adapter operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Worker did not establish its RPC connection in time.
    /// Fatal at adapter construction; the adapter must not be used.
    #[error("worker did not connect within {timeout:?}")]
    StartupTimeout { timeout: Duration },

    /// A specific RPC call exceeded its bound.
    #[error("rpc '{request}' timed out after {timeout:?}")]
    RpcTimeout {
        request: &'static str,
        timeout: Duration,
    },

    /// The one-time fetch-and-build step failed.
    #[error("worker build failed: {reason}")]
    BuildFailed { reason: String },

    /// Worker process could not be spawned.
    #[error("failed to spawn worker process: {source}")]
    SpawnFailed {
        #[source]
        source: std::io::Error,
    },

    /// The worker connection dropped while the adapter was live.
    #[error("worker connection lost")]
    ConnectionLost,

    /// The worker replied with something the adapter cannot parse.
    #[error("malformed worker reply: {reason}")]
    BadReply { reason: String },

    /// Framing-level failure on the control channel.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
