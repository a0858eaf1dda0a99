//! OMS error types

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur in order management
#[derive(Error, Debug)]
pub enum OmsError {
    /// Order not found
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Invalid order state transition
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Storage error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for OMS operations
pub type Result<T> = std::result::Result<T, OmsError>;
