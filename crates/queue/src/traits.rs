//! Queue trait definitions

use async_trait::async_trait;

use crate::error::QueueResult;
use crate::job::ExecuteOrderJob;

/// Transport for execute-order jobs
///
/// Implementations must deliver each enqueued job to some consumer at
/// least once; they are not required to deduplicate.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Push a job onto the queue
    async fn enqueue(&self, job: ExecuteOrderJob) -> QueueResult<()>;

    /// Pop the next job, waiting briefly
    ///
    /// Returns `Ok(None)` when no job arrived within the poll window,
    /// so callers can interleave shutdown checks.
    async fn dequeue(&self) -> QueueResult<Option<ExecuteOrderJob>>;
}

/// Processes a delivered job
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// Handle one delivery
    ///
    /// An `Err` triggers redelivery with an incremented attempt counter
    /// until the queue policy's attempts are exhausted.
    async fn handle(&self, job: ExecuteOrderJob) -> anyhow::Result<()>;
}
