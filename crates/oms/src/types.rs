//! Order domain types
//!
//! This module defines the core domain types for order execution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order type requested by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Execute immediately at the best available quote
    Market,
    /// Execute at a target price or better (accepted but not yet executed)
    Limit,
    /// Execute on token launch (accepted but not yet executed)
    Sniper,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Market => write!(f, "market"),
            OrderType::Limit => write!(f, "limit"),
            OrderType::Sniper => write!(f, "sniper"),
        }
    }
}

impl std::str::FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "market" => Ok(OrderType::Market),
            "limit" => Ok(OrderType::Limit),
            "sniper" => Ok(OrderType::Sniper),
            other => Err(format!("unknown order type: {}", other)),
        }
    }
}

/// Execution status of an order
///
/// Statuses only move forward: pending → routing → building → submitted →
/// confirmed, with failed reachable from any non-terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Accepted, waiting for a worker to pick it up
    Pending,
    /// Selecting the best venue
    Routing,
    /// Building the swap transaction
    Building,
    /// Transaction submitted to the venue
    Submitted,
    /// Swap executed successfully
    Confirmed,
    /// All attempts exhausted
    Failed,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl OrderStatus {
    /// Terminal statuses never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Confirmed | OrderStatus::Failed)
    }

    fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Routing => 1,
            OrderStatus::Building => 2,
            OrderStatus::Submitted => 3,
            OrderStatus::Confirmed => 4,
            OrderStatus::Failed => 4,
        }
    }

    /// Whether moving from `self` to `next` respects the forward-only machine
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == OrderStatus::Failed {
            return true;
        }
        next.rank() == self.rank() + 1
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Routing => write!(f, "routing"),
            OrderStatus::Building => write!(f, "building"),
            OrderStatus::Submitted => write!(f, "submitted"),
            OrderStatus::Confirmed => write!(f, "confirmed"),
            OrderStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "routing" => Ok(OrderStatus::Routing),
            "building" => Ok(OrderStatus::Building),
            "submitted" => Ok(OrderStatus::Submitted),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "failed" => Ok(OrderStatus::Failed),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// Order in the system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier
    pub id: Uuid,
    /// market / limit / sniper
    pub order_type: OrderType,
    /// Token being sold
    pub token_in: String,
    /// Token being bought
    pub token_out: String,
    /// Amount of token_in to swap
    pub amount_in: f64,
    /// Slippage tolerance in percent (0..=5)
    pub slippage: f64,
    /// Current execution status
    pub status: OrderStatus,
    /// Venue chosen by the router
    pub selected_venue: Option<String>,
    /// Transaction hash once submitted
    pub tx_hash: Option<String>,
    /// Price the swap actually executed at
    pub executed_price: Option<f64>,
    /// Why the order failed (set only on failed)
    pub failure_reason: Option<String>,
    /// Order creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new pending order
    pub fn new(
        order_type: OrderType,
        token_in: String,
        token_out: String,
        amount_in: f64,
        slippage: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            order_type,
            token_in,
            token_out,
            amount_in,
            slippage,
            status: OrderStatus::Pending,
            selected_venue: None,
            tx_hash: None,
            executed_price: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, bumping `updated_at`
    pub fn apply(&mut self, update: &OrderUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(ref venue) = update.selected_venue {
            self.selected_venue = Some(venue.clone());
        }
        if let Some(ref tx_hash) = update.tx_hash {
            self.tx_hash = Some(tx_hash.clone());
        }
        if let Some(price) = update.executed_price {
            self.executed_price = Some(price);
        }
        if let Some(ref reason) = update.failure_reason {
            self.failure_reason = Some(reason.clone());
        }
        self.updated_at = Utc::now();
    }
}

/// Partial write set for an order
///
/// Fields left as `None` are untouched by the store.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub selected_venue: Option<String>,
    pub tx_hash: Option<String>,
    pub executed_price: Option<f64>,
    pub failure_reason: Option<String>,
}

impl OrderUpdate {
    /// Update that only moves the status
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Update recording the routing decision
    pub fn venue_selected(venue: impl Into<String>) -> Self {
        Self {
            selected_venue: Some(venue.into()),
            ..Self::default()
        }
    }

    /// Update for a successful execution
    pub fn confirmed(tx_hash: impl Into<String>, executed_price: f64) -> Self {
        Self {
            status: Some(OrderStatus::Confirmed),
            tx_hash: Some(tx_hash.into()),
            executed_price: Some(executed_price),
            ..Self::default()
        }
    }

    /// Update for a terminal failure
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: Some(OrderStatus::Failed),
            failure_reason: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.selected_venue.is_none()
            && self.tx_hash.is_none()
            && self.executed_price.is_none()
            && self.failure_reason.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_new() {
        let order = Order::new(
            OrderType::Market,
            "SOL".to_string(),
            "USDC".to_string(),
            10.0,
            1.0,
        );

        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.selected_venue.is_none());
        assert!(order.tx_hash.is_none());
        assert!(order.failure_reason.is_none());
    }

    #[test]
    fn test_status_forward_only() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Routing));
        assert!(OrderStatus::Routing.can_transition_to(OrderStatus::Building));
        assert!(OrderStatus::Building.can_transition_to(OrderStatus::Submitted));
        assert!(OrderStatus::Submitted.can_transition_to(OrderStatus::Confirmed));

        // No going backwards or skipping ahead
        assert!(!OrderStatus::Routing.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Submitted));

        // Failed is reachable from any non-terminal stage
        assert!(OrderStatus::Routing.can_transition_to(OrderStatus::Failed));
        assert!(OrderStatus::Submitted.can_transition_to(OrderStatus::Failed));

        // Terminal statuses never move
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Failed));
        assert!(!OrderStatus::Failed.can_transition_to(OrderStatus::Routing));
    }

    #[test]
    fn test_status_round_trip_strings() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Routing,
            OrderStatus::Building,
            OrderStatus::Submitted,
            OrderStatus::Confirmed,
            OrderStatus::Failed,
        ] {
            let parsed: OrderStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_apply_update() {
        let mut order = Order::new(
            OrderType::Market,
            "SOL".to_string(),
            "USDC".to_string(),
            5.0,
            0.5,
        );
        let before = order.updated_at;

        order.apply(&OrderUpdate::venue_selected("raydium"));
        assert_eq!(order.selected_venue.as_deref(), Some("raydium"));
        assert_eq!(order.status, OrderStatus::Pending);

        order.apply(&OrderUpdate::confirmed("MOCKTX_abc", 1.01));
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.tx_hash.as_deref(), Some("MOCKTX_abc"));
        assert_eq!(order.executed_price, Some(1.01));
        assert!(order.updated_at >= before);
    }

    #[test]
    fn test_order_type_parse() {
        assert_eq!("market".parse::<OrderType>(), Ok(OrderType::Market));
        assert_eq!("sniper".parse::<OrderType>(), Ok(OrderType::Sniper));
        assert!("stop_loss".parse::<OrderType>().is_err());
    }
}
