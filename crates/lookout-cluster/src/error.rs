//! Error types for the process-group boundary.

use thiserror::Error;

/// Result type alias for process-group operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors that can occur at the process-group boundary.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("coordinator channel closed")]
    ChannelClosed,

    #[error("operation not supported for role: {0}")]
    WrongRole(&'static str),
}
