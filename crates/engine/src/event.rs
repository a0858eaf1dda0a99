//! Status events pushed to subscribed clients
//!
//! These are the exact wire payloads: camelCase keys, with unset fields
//! omitted entirely rather than sent as null.

use oms::OrderStatus;
use serde::{Deserialize, Serialize};
use venues::{ExecutionResult, Quote};

/// One lifecycle update for an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub status: OrderStatus,
    #[serde(
        rename = "chosenVenue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub chosen_venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<Quote>,
    #[serde(rename = "txHash", default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(
        rename = "executedPrice",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub executed_price: Option<f64>,
    #[serde(
        rename = "executedAmountOut",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub executed_amount_out: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusEvent {
    fn bare(status: OrderStatus) -> Self {
        Self {
            status,
            chosen_venue: None,
            quote: None,
            tx_hash: None,
            executed_price: None,
            executed_amount_out: None,
            error: None,
        }
    }

    /// Worker picked the order up
    pub fn pending() -> Self {
        Self::bare(OrderStatus::Pending)
    }

    /// Routing started; no decision yet
    pub fn routing() -> Self {
        Self::bare(OrderStatus::Routing)
    }

    /// Routing finished with a decision
    pub fn routed(venue: impl Into<String>, quote: Quote) -> Self {
        Self {
            chosen_venue: Some(venue.into()),
            quote: Some(quote),
            ..Self::bare(OrderStatus::Routing)
        }
    }

    /// Building the swap transaction
    pub fn building(venue: impl Into<String>, quote: Quote) -> Self {
        Self {
            chosen_venue: Some(venue.into()),
            quote: Some(quote),
            ..Self::bare(OrderStatus::Building)
        }
    }

    /// Transaction handed to the venue
    pub fn submitted() -> Self {
        Self::bare(OrderStatus::Submitted)
    }

    /// Swap executed
    pub fn confirmed(result: &ExecutionResult) -> Self {
        Self {
            tx_hash: Some(result.tx_hash.clone()),
            executed_price: Some(result.executed_price),
            executed_amount_out: Some(result.executed_amount_out),
            ..Self::bare(OrderStatus::Confirmed)
        }
    }

    /// Attempts exhausted
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::bare(OrderStatus::Failed)
        }
    }
}
