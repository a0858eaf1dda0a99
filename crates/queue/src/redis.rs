//! Redis-backed job queue
//!
//! Jobs are JSON payloads on a Redis list: `LPUSH` to enqueue, blocking
//! `BRPOP` to dequeue. This is the durable transport for multi-process
//! deployments.

use std::sync::Arc;

use ::redis::AsyncCommands;
use async_trait::async_trait;
use tracing::info;

use crate::error::{QueueError, QueueResult};
use crate::job::ExecuteOrderJob;
use crate::traits::JobQueue;

/// Seconds BRPOP blocks before yielding control back to the consumer loop
const POLL_TIMEOUT_SECS: f64 = 1.0;

/// Redis list queue
pub struct RedisJobQueue {
    redis: Arc<tokio::sync::Mutex<::redis::aio::ConnectionManager>>,
    queue_key: String,
}

impl RedisJobQueue {
    /// Connect to Redis and use `queue_key` as the job list
    pub async fn connect(url: &str, queue_key: impl Into<String>) -> QueueResult<Self> {
        let queue_key = queue_key.into();
        info!(%queue_key, "Connecting to Redis job queue");

        let client = ::redis::Client::open(url)
            .map_err(|e| QueueError::TransportError(e.to_string()))?;

        let connection_manager = client
            .get_connection_manager()
            .await
            .map_err(|e| QueueError::TransportError(e.to_string()))?;

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(connection_manager)),
            queue_key,
        })
    }
}

#[async_trait]
impl JobQueue for RedisJobQueue {
    async fn enqueue(&self, job: ExecuteOrderJob) -> QueueResult<()> {
        let payload = serde_json::to_string(&job)
            .map_err(|e| QueueError::SerializationError(e.to_string()))?;

        let mut redis = self.redis.lock().await;
        redis
            .lpush::<_, _, ()>(&self.queue_key, payload)
            .await
            .map_err(|e| QueueError::TransportError(e.to_string()))?;

        Ok(())
    }

    async fn dequeue(&self) -> QueueResult<Option<ExecuteOrderJob>> {
        let mut redis = self.redis.lock().await;
        let popped: Option<(String, String)> = redis
            .brpop(&self.queue_key, POLL_TIMEOUT_SECS)
            .await
            .map_err(|e| QueueError::TransportError(e.to_string()))?;

        match popped {
            Some((_key, payload)) => {
                let job = serde_json::from_str(&payload)
                    .map_err(|e| QueueError::SerializationError(e.to_string()))?;
                Ok(Some(job))
            }
            None => Ok(None),
        }
    }
}
