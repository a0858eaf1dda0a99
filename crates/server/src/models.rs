//! Request and response bodies for the order API
//!
//! All wire payloads use camelCase keys. Optional response fields are
//! omitted rather than serialized as null.

use chrono::{DateTime, Utc};
use oms::{Order, OrderStatus, OrderType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Highest slippage tolerance accepted, in percent
pub const MAX_SLIPPAGE_PCT: f64 = 5.0;

/// Body of `POST /api/orders/execute`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteOrderRequest {
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: f64,
    pub slippage: f64,
}

impl ExecuteOrderRequest {
    /// Validate field constraints, returning the first violation
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.token_in.trim().is_empty() {
            return Err("tokenIn must not be empty".to_string());
        }
        if self.token_out.trim().is_empty() {
            return Err("tokenOut must not be empty".to_string());
        }
        if !self.amount_in.is_finite() || self.amount_in <= 0.0 {
            return Err("amountIn must be a positive number".to_string());
        }
        if !self.slippage.is_finite() || !(0.0..=MAX_SLIPPAGE_PCT).contains(&self.slippage) {
            return Err(format!(
                "slippage must be between 0 and {} percent",
                MAX_SLIPPAGE_PCT
            ));
        }
        Ok(())
    }
}

/// Body returned by `POST /api/orders/execute`
#[derive(Debug, Serialize)]
pub struct ExecuteOrderResponse {
    #[serde(rename = "orderId", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Uuid>,
    pub message: String,
}

impl ExecuteOrderResponse {
    pub fn accepted(order_id: Uuid) -> Self {
        Self {
            order_id: Some(order_id),
            message: "Order received. WebSocket will stream updates.".to_string(),
        }
    }

    pub fn unsupported_type() -> Self {
        Self {
            order_id: None,
            message: "Only market orders are currently supported in the first version."
                .to_string(),
        }
    }
}

/// Client-facing view of an order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOrder {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: f64,
    pub slippage: f64,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executed_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for ApiOrder {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            order_type: order.order_type,
            token_in: order.token_in,
            token_out: order.token_out,
            amount_in: order.amount_in,
            slippage: order.slippage,
            status: order.status,
            selected_venue: order.selected_venue,
            tx_hash: order.tx_hash,
            executed_price: order.executed_price,
            failure_reason: order.failure_reason,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Body returned by `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Error envelope used by all endpoints
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount_in: f64, slippage: f64) -> ExecuteOrderRequest {
        ExecuteOrderRequest {
            order_type: OrderType::Market,
            token_in: "SOL".to_string(),
            token_out: "USDC".to_string(),
            amount_in,
            slippage,
        }
    }

    #[test]
    fn test_validate_accepts_boundaries() {
        assert!(request(0.000001, 0.0).validate().is_ok());
        assert!(request(10.0, 5.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        assert!(request(0.0, 1.0).validate().is_err());
        assert!(request(-1.0, 1.0).validate().is_err());
        assert!(request(10.0, 5.1).validate().is_err());
        assert!(request(10.0, -0.1).validate().is_err());
        assert!(request(f64::NAN, 1.0).validate().is_err());

        let mut req = request(10.0, 1.0);
        req.token_in = "  ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_request_wire_names() {
        let req: ExecuteOrderRequest = serde_json::from_value(serde_json::json!({
            "type": "market",
            "tokenIn": "SOL",
            "tokenOut": "USDC",
            "amountIn": 1.5,
            "slippage": 0.5,
        }))
        .unwrap();
        assert_eq!(req.order_type, OrderType::Market);
        assert_eq!(req.token_in, "SOL");
        assert_eq!(req.amount_in, 1.5);
    }

    #[test]
    fn test_accepted_response_shape() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(ExecuteOrderResponse::accepted(id)).unwrap();
        assert_eq!(json["orderId"], id.to_string());
        assert_eq!(json["message"], "Order received. WebSocket will stream updates.");
    }

    #[test]
    fn test_unsupported_response_omits_order_id() {
        let json = serde_json::to_value(ExecuteOrderResponse::unsupported_type()).unwrap();
        assert!(json.get("orderId").is_none());
    }

    #[test]
    fn test_api_order_omits_unset_fields() {
        let order = Order::new(
            OrderType::Market,
            "SOL".to_string(),
            "USDC".to_string(),
            10.0,
            1.0,
        );
        let json = serde_json::to_value(ApiOrder::from(order)).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["tokenIn"], "SOL");
        assert!(json.get("txHash").is_none());
        assert!(json.get("selectedVenue").is_none());
    }
}
