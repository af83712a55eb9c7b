//! Runtime error type.

use beyond_socket::SocketError;

/// Errors from [`LauncherRuntime`](crate::LauncherRuntime).
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Settings produced an unusable socket configuration.
    #[error("invalid socket configuration: {0}")]
    Config(#[from] SocketError),
}
