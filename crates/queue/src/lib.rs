//! Job queue transport and consumer for DexFlow
//!
//! Orders travel from the HTTP API to the execution pipeline as
//! [`ExecuteOrderJob`]s over a [`JobQueue`]. The [`QueueConsumer`]
//! drains the queue with bounded concurrency and redelivers failed
//! jobs with an incremented attempt counter.

pub mod consumer;
pub mod error;
pub mod job;
pub mod memory;
pub mod redis;
pub mod traits;

pub use consumer::{QueueConsumer, QueuePolicy};
pub use error::{QueueError, QueueResult};
pub use job::ExecuteOrderJob;
pub use memory::InMemoryJobQueue;
pub use redis::RedisJobQueue;
pub use traits::{JobHandler, JobQueue};
