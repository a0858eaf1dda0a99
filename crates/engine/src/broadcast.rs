//! Status fan-out
//!
//! Maps each order to its set of subscribed clients. Delivery is
//! fire-and-forget: there is no replay for late subscribers, and a
//! closed client never fails the sender.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use observability::PipelineMetrics;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::event::StatusEvent;

/// Identifies one subscription on one order
pub type SubscriberId = u64;

/// Fan-out registry for order status events
pub struct StatusBroadcaster {
    subscribers: RwLock<HashMap<Uuid, HashMap<SubscriberId, mpsc::UnboundedSender<String>>>>,
    next_id: AtomicU64,
    metrics: PipelineMetrics,
}

impl StatusBroadcaster {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            metrics: PipelineMetrics::new(),
        }
    }

    /// Subscribe to an order's status stream
    ///
    /// Returns the subscriber id (needed to unsubscribe) and the
    /// receiving end carrying serialized events.
    pub fn subscribe(&self, order_id: Uuid) -> (SubscriberId, mpsc::UnboundedReceiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();

        self.subscribers
            .write()
            .entry(order_id)
            .or_default()
            .insert(id, sender);

        self.metrics.subscriber_added();
        debug!(%order_id, subscriber = id, "Status subscriber added");
        (id, receiver)
    }

    /// Drop one subscription; empty buckets are pruned
    pub fn unsubscribe(&self, order_id: Uuid, subscriber: SubscriberId) {
        let mut subscribers = self.subscribers.write();
        if let Some(bucket) = subscribers.get_mut(&order_id) {
            if bucket.remove(&subscriber).is_some() {
                self.metrics.subscriber_removed();
            }
            if bucket.is_empty() {
                subscribers.remove(&order_id);
            }
        }
        debug!(%order_id, subscriber, "Status subscriber removed");
    }

    /// Deliver an event to every subscriber of the order
    ///
    /// Serializes once and never reports failure to the caller; clients
    /// whose channel has closed are dropped from the registry.
    pub fn send(&self, order_id: Uuid, event: &StatusEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(%order_id, error = %err, "Failed to serialize status event");
                return;
            }
        };

        let mut subscribers = self.subscribers.write();
        let Some(bucket) = subscribers.get_mut(&order_id) else {
            return;
        };

        let before = bucket.len();
        bucket.retain(|_, sender| sender.send(payload.clone()).is_ok());
        for _ in bucket.len()..before {
            self.metrics.subscriber_removed();
        }
        if bucket.is_empty() {
            subscribers.remove(&order_id);
        }
    }

    /// Number of live subscriptions for an order
    pub fn subscriber_count(&self, order_id: Uuid) -> usize {
        self.subscribers
            .read()
            .get(&order_id)
            .map(|bucket| bucket.len())
            .unwrap_or(0)
    }
}

impl Default for StatusBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
