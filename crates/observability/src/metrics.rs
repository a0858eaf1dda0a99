//! Prometheus metrics infrastructure
//!
//! Provides the exporter bootstrap and a metric set for the order
//! execution pipeline.

use metrics::{counter, gauge, histogram, Counter, Gauge, Histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Initialize the Prometheus metrics exporter
///
/// Starts an HTTP listener on the given port that exposes metrics at
/// the `/metrics` endpoint.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Metrics for the order execution pipeline
///
/// # Metrics
///
/// * `orders_confirmed_total` - Orders that reached confirmed
/// * `orders_failed_total` - Orders that exhausted their attempts
/// * `orders_retried_total` - Attempts that failed and were redelivered
/// * `order_execution_duration_seconds` - Per-attempt processing duration
/// * `status_subscribers` - Currently subscribed status-stream clients
#[derive(Clone)]
pub struct PipelineMetrics {
    confirmed_total: Counter,
    failed_total: Counter,
    retried_total: Counter,
    execution_duration: Histogram,
    status_subscribers: Gauge,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            confirmed_total: counter!("orders_confirmed_total"),
            failed_total: counter!("orders_failed_total"),
            retried_total: counter!("orders_retried_total"),
            execution_duration: histogram!("order_execution_duration_seconds"),
            status_subscribers: gauge!("status_subscribers"),
        }
    }

    /// Record a completed execution attempt
    pub fn record_attempt(&self, duration: Duration) {
        self.execution_duration.record(duration.as_secs_f64());
    }

    pub fn order_confirmed(&self) {
        self.confirmed_total.increment(1);
    }

    pub fn order_failed(&self) {
        self.failed_total.increment(1);
    }

    pub fn order_retried(&self) {
        self.retried_total.increment(1);
    }

    pub fn subscriber_added(&self) {
        self.status_subscribers.increment(1.0);
    }

    pub fn subscriber_removed(&self) {
        self.status_subscribers.decrement(1.0);
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_metrics_creation() {
        // Just verify it doesn't panic without an installed recorder
        let metrics = PipelineMetrics::new();
        metrics.order_confirmed();
        metrics.order_retried();
        metrics.record_attempt(Duration::from_millis(5));
    }
}
