//! The order execution pipeline
//!
//! Drives one order through routing, building and execution, emitting a
//! status event at every stage. Persistence failures before the terminal
//! stage are retryable; the terminal failed-write is best effort.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use observability::PipelineMetrics;
use tracing::{error, info, warn};
use uuid::Uuid;

use oms::{OrderStore, OrderUpdate};
use queue::{ExecuteOrderJob, JobHandler};
use venues::{round_dp, VenueRouter};

use crate::broadcast::StatusBroadcaster;
use crate::error::{EngineError, Result};
use crate::event::StatusEvent;

/// Executes orders delivered by the queue consumer
pub struct OrderPipeline {
    store: Arc<dyn OrderStore>,
    router: Arc<VenueRouter>,
    broadcaster: Arc<StatusBroadcaster>,
    max_attempts: u32,
    metrics: PipelineMetrics,
}

impl OrderPipeline {
    pub fn new(
        store: Arc<dyn OrderStore>,
        router: Arc<VenueRouter>,
        broadcaster: Arc<StatusBroadcaster>,
        max_attempts: u32,
    ) -> Self {
        Self {
            store,
            router,
            broadcaster,
            max_attempts,
            metrics: PipelineMetrics::new(),
        }
    }

    /// Run one execution attempt for an order
    ///
    /// `attempt` is the transport's 0-based delivery counter. Failures on
    /// attempts below `max_attempts` propagate untouched so the transport
    /// redelivers; the attempt carrying `max_attempts` is terminal and
    /// persists the failure before propagating.
    pub async fn process(&self, order_id: Uuid, attempt: u32) -> Result<()> {
        let started = Instant::now();
        info!(%order_id, attempt, "Processing order");

        self.broadcaster.send(order_id, &StatusEvent::pending());

        let order = self
            .store
            .find_by_id(order_id)
            .await
            .map_err(|source| EngineError::Load { order_id, source })?;

        let outcome = self.execute(&order).await;
        self.metrics.record_attempt(started.elapsed());

        match outcome {
            Ok(()) => {
                self.metrics.order_confirmed();
                Ok(())
            }
            Err(err) => {
                if attempt < self.max_attempts {
                    // Leave the stored order untouched; the transport
                    // will redeliver this attempt
                    warn!(
                        %order_id,
                        attempt,
                        error = %err,
                        "Attempt failed, leaving redelivery to the transport"
                    );
                    self.metrics.order_retried();
                    return Err(err);
                }

                let reason = err.to_string();
                error!(%order_id, attempt, %reason, "Attempts exhausted, failing order");

                if let Err(persist_err) = self
                    .store
                    .update_by_id(order_id, OrderUpdate::failed(&reason))
                    .await
                {
                    // Best effort only; the failure still propagates
                    error!(
                        %order_id,
                        error = %persist_err,
                        "Failed to persist terminal failure"
                    );
                }

                self.metrics.order_failed();
                self.broadcaster.send(order_id, &StatusEvent::failed(&reason));
                Err(err)
            }
        }
    }

    async fn execute(&self, order: &oms::Order) -> Result<()> {
        let order_id = order.id;

        // ROUTING
        self.broadcaster.send(order_id, &StatusEvent::routing());
        let decision = self
            .router
            .route(&order.token_in, &order.token_out, order.amount_in)
            .await?;

        // Persist the routing decision for transparency before announcing it
        self.store
            .update_by_id(order_id, OrderUpdate::venue_selected(&decision.venue))
            .await
            .map_err(EngineError::Storage)?;
        self.broadcaster.send(
            order_id,
            &StatusEvent::routed(&decision.venue, decision.quote),
        );

        // BUILDING
        self.broadcaster.send(
            order_id,
            &StatusEvent::building(&decision.venue, decision.quote),
        );
        let min_amount_out = round_dp(
            decision.quote.amount_out * (1.0 - order.slippage / 100.0),
            8,
        );

        // SUBMIT / EXECUTE
        self.broadcaster.send(order_id, &StatusEvent::submitted());
        let venue = self
            .router
            .adapter(&decision.venue)
            .ok_or_else(|| EngineError::UnknownVenue(decision.venue.clone()))?;
        let result = venue.execute_swap(order.amount_in, min_amount_out).await?;

        // CONFIRMED
        self.broadcaster
            .send(order_id, &StatusEvent::confirmed(&result));
        self.store
            .update_by_id(
                order_id,
                OrderUpdate::confirmed(&result.tx_hash, result.executed_price),
            )
            .await
            .map_err(EngineError::Storage)?;

        info!(%order_id, tx_hash = %result.tx_hash, "Order confirmed");
        Ok(())
    }
}

#[async_trait]
impl JobHandler for OrderPipeline {
    async fn handle(&self, job: ExecuteOrderJob) -> anyhow::Result<()> {
        Ok(self.process(job.order_id, job.attempt).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oms::{InMemoryOrderStore, OmsResult, Order, OrderStatus, OrderType};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;
    use venues::{SequencePriceSource, SimulatedVenue, VenueAdapter};

    /// Store wrapper that counts writes, for retry-suppression checks
    struct RecordingStore {
        inner: InMemoryOrderStore,
        updates: AtomicUsize,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                inner: InMemoryOrderStore::new(),
                updates: AtomicUsize::new(0),
            }
        }

        fn update_count(&self) -> usize {
            self.updates.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OrderStore for RecordingStore {
        async fn create(&self, order: Order) -> OmsResult<Order> {
            self.inner.create(order).await
        }

        async fn find_by_id(&self, order_id: Uuid) -> OmsResult<Order> {
            self.inner.find_by_id(order_id).await
        }

        async fn update_by_id(&self, order_id: Uuid, update: OrderUpdate) -> OmsResult<Order> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.inner.update_by_id(order_id, update).await
        }
    }

    /// Adapter whose quoting is down, for routing-failure checks
    struct OfflineVenue {
        name: String,
    }

    #[async_trait]
    impl VenueAdapter for OfflineVenue {
        fn name(&self) -> &str {
            &self.name
        }

        async fn get_quote(
            &self,
            _token_in: &str,
            _token_out: &str,
            _amount_in: f64,
        ) -> venues::Result<venues::Quote> {
            Err(venues::VenueError::quote_failed(&self.name, "venue offline"))
        }

        async fn execute_swap(
            &self,
            _amount_in: f64,
            _min_amount_out: f64,
        ) -> venues::Result<venues::ExecutionResult> {
            unimplemented!("quoting never succeeds, so no swap is reachable")
        }
    }

    fn test_order() -> Order {
        Order::new(
            OrderType::Market,
            "SOL".to_string(),
            "USDC".to_string(),
            10.0,
            1.0,
        )
    }

    fn venue_with_prices(name: &str, fee: f64, prices: Vec<f64>) -> Arc<dyn VenueAdapter> {
        Arc::new(SimulatedVenue::with_price_source(
            name,
            fee,
            Arc::new(SequencePriceSource::new(prices)),
        ))
    }

    async fn drain_statuses(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut statuses = Vec::new();
        while let Ok(payload) = rx.try_recv() {
            let event: StatusEvent = serde_json::from_str(&payload).unwrap();
            statuses.push(event.status.to_string());
        }
        statuses
    }

    fn pipeline_with(
        store: Arc<dyn OrderStore>,
        venues: Vec<Arc<dyn VenueAdapter>>,
    ) -> (OrderPipeline, Arc<StatusBroadcaster>) {
        let broadcaster = Arc::new(StatusBroadcaster::new());
        let pipeline = OrderPipeline::new(
            store,
            Arc::new(VenueRouter::new(venues)),
            Arc::clone(&broadcaster),
            3,
        );
        (pipeline, broadcaster)
    }

    #[tokio::test]
    async fn test_happy_path_events_and_persistence() {
        let store = Arc::new(InMemoryOrderStore::new());
        let order = test_order();
        let order_id = order.id;
        store.create(order).await.unwrap();

        let (pipeline, broadcaster) = pipeline_with(
            Arc::clone(&store) as Arc<dyn OrderStore>,
            vec![venue_with_prices("raydium", 0.003, vec![1.0])],
        );
        let (_sub, mut rx) = broadcaster.subscribe(order_id);

        pipeline.process(order_id, 0).await.unwrap();

        let statuses = drain_statuses(&mut rx).await;
        assert_eq!(
            statuses,
            vec![
                "pending",
                "routing",
                "routing",
                "building",
                "submitted",
                "confirmed"
            ]
        );

        let stored = store.find_by_id(order_id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Confirmed);
        assert_eq!(stored.selected_venue.as_deref(), Some("raydium"));
        assert!(stored.tx_hash.as_deref().unwrap().starts_with("MOCKTX_"));
        assert_eq!(stored.executed_price, Some(1.0));
        assert!(stored.failure_reason.is_none());
    }

    #[tokio::test]
    async fn test_routed_event_carries_venue_and_quote() {
        let store = Arc::new(InMemoryOrderStore::new());
        let order = test_order();
        let order_id = order.id;
        store.create(order).await.unwrap();

        let (pipeline, broadcaster) = pipeline_with(
            store,
            vec![venue_with_prices("meteora", 0.002, vec![1.01])],
        );
        let (_sub, mut rx) = broadcaster.subscribe(order_id);

        pipeline.process(order_id, 0).await.unwrap();

        let mut events = Vec::new();
        while let Ok(payload) = rx.try_recv() {
            events.push(serde_json::from_str::<StatusEvent>(&payload).unwrap());
        }

        let routed = &events[2];
        assert_eq!(routed.status, OrderStatus::Routing);
        assert_eq!(routed.chosen_venue.as_deref(), Some("meteora"));
        assert_eq!(routed.quote.unwrap().amount_out, 10.1);

        let confirmed = events.last().unwrap();
        assert_eq!(confirmed.status, OrderStatus::Confirmed);
        assert_eq!(confirmed.executed_price, Some(1.01));
    }

    #[tokio::test]
    async fn test_retryable_failure_never_touches_the_store() {
        let store = Arc::new(RecordingStore::new());
        let order = test_order();
        let order_id = order.id;
        store.create(order).await.unwrap();

        // Quote at 1.0 then execute at 0.90: far below the 1% floor
        let (pipeline, broadcaster) = pipeline_with(
            Arc::clone(&store) as Arc<dyn OrderStore>,
            vec![venue_with_prices("raydium", 0.003, vec![1.0, 0.90, 1.0, 0.90])],
        );
        let (_sub, mut rx) = broadcaster.subscribe(order_id);

        let err = pipeline.process(order_id, 0).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Venue(venues::VenueError::SlippageExceeded)
        ));

        // Routing succeeded so the venue-selected write happened, but no
        // terminal status was written
        assert_eq!(store.update_count(), 1);
        let stored = store.find_by_id(order_id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
        assert!(stored.failure_reason.is_none());

        // No failed event on a retryable attempt
        let statuses = drain_statuses(&mut rx).await;
        assert_eq!(
            statuses,
            vec!["pending", "routing", "routing", "building", "submitted"]
        );
    }

    #[tokio::test]
    async fn test_routing_failure_leaves_store_untouched() {
        let store = Arc::new(RecordingStore::new());
        let order = test_order();
        let order_id = order.id;
        store.create(order).await.unwrap();

        let (pipeline, broadcaster) = pipeline_with(
            Arc::clone(&store) as Arc<dyn OrderStore>,
            vec![Arc::new(OfflineVenue {
                name: "raydium".to_string(),
            })],
        );
        let (_sub, mut rx) = broadcaster.subscribe(order_id);

        let err = pipeline.process(order_id, 0).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Venue(venues::VenueError::QuoteFailed { .. })
        ));

        // Routing never produced a decision, so nothing was written at all
        assert_eq!(store.update_count(), 0);
        let stored = store.find_by_id(order_id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
        assert!(stored.selected_venue.is_none());

        let statuses = drain_statuses(&mut rx).await;
        assert_eq!(statuses, vec!["pending", "routing"]);
    }

    #[tokio::test]
    async fn test_exhausted_attempt_persists_failure() {
        let store = Arc::new(InMemoryOrderStore::new());
        let order = test_order();
        let order_id = order.id;
        store.create(order).await.unwrap();

        let (pipeline, broadcaster) = pipeline_with(
            Arc::clone(&store) as Arc<dyn OrderStore>,
            vec![venue_with_prices("raydium", 0.003, vec![1.0, 0.90])],
        );
        let (_sub, mut rx) = broadcaster.subscribe(order_id);

        // attempt == max_attempts is the terminal delivery
        let err = pipeline.process(order_id, 3).await.unwrap_err();
        assert!(matches!(err, EngineError::Venue(_)));

        let stored = store.find_by_id(order_id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Failed);
        assert_eq!(
            stored.failure_reason.as_deref(),
            Some("Slippage exceeded, swap failed")
        );

        let statuses = drain_statuses(&mut rx).await;
        assert_eq!(statuses.last().map(String::as_str), Some("failed"));
    }

    #[tokio::test]
    async fn test_missing_order_propagates_load_error() {
        let store = Arc::new(RecordingStore::new());
        let (pipeline, _broadcaster) = pipeline_with(
            Arc::clone(&store) as Arc<dyn OrderStore>,
            vec![venue_with_prices("raydium", 0.003, vec![1.0])],
        );

        let err = pipeline.process(Uuid::new_v4(), 0).await.unwrap_err();
        assert!(matches!(err, EngineError::Load { .. }));
        assert_eq!(store.update_count(), 0);
    }

    #[tokio::test]
    async fn test_best_venue_wins_end_to_end() {
        let store = Arc::new(InMemoryOrderStore::new());
        let order = test_order();
        let order_id = order.id;
        store.create(order).await.unwrap();

        // meteora quotes higher and charges less
        let (pipeline, _broadcaster) = pipeline_with(
            Arc::clone(&store) as Arc<dyn OrderStore>,
            vec![
                venue_with_prices("raydium", 0.003, vec![0.99]),
                venue_with_prices("meteora", 0.002, vec![1.02]),
            ],
        );

        pipeline.process(order_id, 0).await.unwrap();

        let stored = store.find_by_id(order_id).await.unwrap();
        assert_eq!(stored.selected_venue.as_deref(), Some("meteora"));
        assert_eq!(stored.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_handles_queue_jobs() {
        let store = Arc::new(InMemoryOrderStore::new());
        let order = test_order();
        let order_id = order.id;
        store.create(order).await.unwrap();

        let (pipeline, _broadcaster) = pipeline_with(
            Arc::clone(&store) as Arc<dyn OrderStore>,
            vec![venue_with_prices("raydium", 0.003, vec![1.0])],
        );

        let handler: &dyn JobHandler = &pipeline;
        handler
            .handle(ExecuteOrderJob::new(order_id))
            .await
            .unwrap();

        let stored = store.find_by_id(order_id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Confirmed);
    }
}
