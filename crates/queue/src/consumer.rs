//! Queue consumer
//!
//! Drains a [`JobQueue`] with bounded concurrency. Failed jobs are
//! redelivered with attempt + 1 until the policy's attempts run out;
//! the delivery carrying `attempt == max_attempts` is the final one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::QueueResult;
use crate::job::ExecuteOrderJob;
use crate::traits::{JobHandler, JobQueue};

/// Delivery policy for the consumer
#[derive(Debug, Clone)]
pub struct QueuePolicy {
    /// Highest attempt number that will be delivered (0-based counter,
    /// so a value of 3 yields deliveries at attempts 0, 1, 2 and 3)
    pub max_attempts: u32,
    /// Maximum jobs processed simultaneously
    pub concurrency: usize,
    /// Pause before a redelivery
    pub retry_backoff: Duration,
}

impl Default for QueuePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            concurrency: 10,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// Pulls jobs off the queue and hands them to the handler
pub struct QueueConsumer {
    queue: Arc<dyn JobQueue>,
    handler: Arc<dyn JobHandler>,
    policy: QueuePolicy,
    permits: Arc<Semaphore>,
}

impl QueueConsumer {
    pub fn new(queue: Arc<dyn JobQueue>, handler: Arc<dyn JobHandler>, policy: QueuePolicy) -> Self {
        let permits = Arc::new(Semaphore::new(policy.concurrency));
        Self {
            queue,
            handler,
            policy,
            permits,
        }
    }

    /// Run until the shutdown token fires, then drain in-flight jobs
    pub async fn run(&self, shutdown: CancellationToken) -> QueueResult<()> {
        info!(
            concurrency = self.policy.concurrency,
            max_attempts = self.policy.max_attempts,
            "Queue consumer started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                job = self.queue.dequeue() => {
                    match job? {
                        Some(job) => self.dispatch(job).await,
                        None => continue,
                    }
                }
            }
        }

        // Wait for in-flight jobs before reporting clean shutdown
        let _ = self
            .permits
            .acquire_many(self.policy.concurrency as u32)
            .await;
        info!("Queue consumer stopped");
        Ok(())
    }

    async fn dispatch(&self, job: ExecuteOrderJob) {
        let permit = match self.permits.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return,
        };

        let queue = Arc::clone(&self.queue);
        let handler = Arc::clone(&self.handler);
        let policy = self.policy.clone();

        tokio::spawn(async move {
            let _permit = permit;
            if let Err(err) = handler.handle(job).await {
                let next = job.retry();
                if next.attempt <= policy.max_attempts {
                    warn!(
                        order_id = %job.order_id,
                        attempt = job.attempt,
                        next_attempt = next.attempt,
                        error = %err,
                        "Job failed, scheduling redelivery"
                    );
                    tokio::time::sleep(policy.retry_backoff).await;
                    if let Err(enqueue_err) = queue.enqueue(next).await {
                        error!(
                            order_id = %job.order_id,
                            error = %enqueue_err,
                            "Failed to re-enqueue job"
                        );
                    }
                } else {
                    error!(
                        order_id = %job.order_id,
                        attempt = job.attempt,
                        error = %err,
                        "Job attempts exhausted"
                    );
                }
            }
        });
    }
}
