//! In-memory job queue implementation

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::Mutex;

use crate::error::{QueueError, QueueResult};
use crate::job::ExecuteOrderJob;
use crate::traits::JobQueue;

const POLL_WINDOW: Duration = Duration::from_millis(100);

/// Channel-backed queue for tests and single-process deployments
pub struct InMemoryJobQueue {
    sender: mpsc::UnboundedSender<ExecuteOrderJob>,
    receiver: Mutex<mpsc::UnboundedReceiver<ExecuteOrderJob>>,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
        }
    }
}

impl Default for InMemoryJobQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job: ExecuteOrderJob) -> QueueResult<()> {
        self.sender.send(job).map_err(|_| QueueError::Closed)
    }

    async fn dequeue(&self) -> QueueResult<Option<ExecuteOrderJob>> {
        let mut receiver = self.receiver.lock().await;
        match tokio::time::timeout(POLL_WINDOW, receiver.recv()).await {
            Ok(Some(job)) => Ok(Some(job)),
            Ok(None) => Err(QueueError::Closed),
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_enqueue_dequeue_fifo() {
        let queue = InMemoryJobQueue::new();
        let first = ExecuteOrderJob::new(Uuid::new_v4());
        let second = ExecuteOrderJob::new(Uuid::new_v4());

        queue.enqueue(first).await.unwrap();
        queue.enqueue(second).await.unwrap();

        assert_eq!(queue.dequeue().await.unwrap(), Some(first));
        assert_eq!(queue.dequeue().await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_dequeue_empty_returns_none() {
        let queue = InMemoryJobQueue::new();
        assert_eq!(queue.dequeue().await.unwrap(), None);
    }
}
