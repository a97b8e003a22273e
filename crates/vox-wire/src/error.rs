//! Wire transport error types.

use thiserror::Error;

/// Errors from framed reads and writes.
#[derive(Debug, Error)]
pub enum WireError {
    /// Body too long to encode in the fixed-width header.
    #[error("frame body of {len} bytes exceeds header capacity ({max} max)")]
    FrameTooLarge { len: usize, max: usize },

    /// Length header was not a decimal number.
    #[error("malformed frame header: {header:?}")]
    BadHeader { header: String },

    /// Channel closed before a full frame was read.
    #[error("connection closed mid-frame")]
    ConnectionClosed,

    /// Body was not valid JSON.
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
