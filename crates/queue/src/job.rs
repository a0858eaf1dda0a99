//! Job payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A request to drive one order through the execution pipeline
///
/// `attempt` is zero-based and owned by the transport: the producer
/// enqueues attempt 0 and the consumer redelivers with attempt + 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteOrderJob {
    #[serde(rename = "orderId")]
    pub order_id: Uuid,
    #[serde(default)]
    pub attempt: u32,
}

impl ExecuteOrderJob {
    /// First delivery of an order
    pub fn new(order_id: Uuid) -> Self {
        Self {
            order_id,
            attempt: 0,
        }
    }

    /// The redelivery of this job after a failure
    pub fn retry(&self) -> Self {
        Self {
            order_id: self.order_id,
            attempt: self.attempt + 1,
        }
    }
}
