//! Collector error types.

use thiserror::Error;

/// Result type alias for collector operations.
pub type CollectorResult<T> = Result<T, CollectorError>;

/// Errors that can occur on the collector façade.
///
/// Recording invalid *values* is never an error — that is a designed
/// silent no-op. These errors cover programmer mistakes surfaced
/// eagerly: misconfigured operation registration and dispatch to a
/// name nothing registered.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("operation already registered: {0}")]
    DuplicateOperation(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),
}
