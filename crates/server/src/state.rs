//! Shared state handed to every request handler

use std::sync::Arc;

use engine::StatusBroadcaster;
use oms::OrderStore;
use queue::JobQueue;

/// Dependencies the HTTP and WebSocket handlers operate on
pub struct AppState {
    pub store: Arc<dyn OrderStore>,
    pub queue: Arc<dyn JobQueue>,
    pub broadcaster: Arc<StatusBroadcaster>,
    pub service_name: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn OrderStore>,
        queue: Arc<dyn JobQueue>,
        broadcaster: Arc<StatusBroadcaster>,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            queue,
            broadcaster,
            service_name: service_name.into(),
        }
    }
}
