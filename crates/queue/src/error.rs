//! Queue error types

use thiserror::Error;

/// Errors from the queue transport
#[derive(Error, Debug)]
pub enum QueueError {
    /// The transport is unreachable or refused the operation
    #[error("Queue transport error: {0}")]
    TransportError(String),

    /// A job payload could not be encoded or decoded
    #[error("Job serialization error: {0}")]
    SerializationError(String),

    /// The queue has been closed
    #[error("Queue closed")]
    Closed,
}

/// Result type for queue operations
pub type QueueResult<T> = std::result::Result<T, QueueError>;
