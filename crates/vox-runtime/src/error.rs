//! Runtime error types.

use thiserror::Error;

/// Errors from arbitration.
///
/// "No acceptable match" is not represented here: that outcome is the
/// unknown-sentinel [`Resolution`](vox_types::Resolution), not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    /// An engine emitted an identifier with no registered handler.
    /// Programming error; aborts the query it occurred in.
    #[error("no handler bound for intent '{name}'")]
    UnboundIntent { name: String },
}
