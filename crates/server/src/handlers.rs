//! HTTP request handlers for the order API

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use oms::{OmsError, Order, OrderType};
use queue::ExecuteOrderJob;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{
    ApiOrder, ErrorResponse, ExecuteOrderRequest, ExecuteOrderResponse, HealthResponse,
};
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("VALIDATION_ERROR", message)),
    )
}

fn internal_error(code: &str, message: impl Into<String>) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(code, message)),
    )
}

/// `POST /api/orders/execute`
///
/// Accepts a market order, persists it as pending and enqueues it for
/// the execution pipeline. Non-market order types are acknowledged with
/// an explanatory message and no order is created.
pub async fn execute_order(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExecuteOrderRequest>,
) -> std::result::Result<Json<ExecuteOrderResponse>, ApiError> {
    if let Err(message) = request.validate() {
        return Err(bad_request(message));
    }

    if request.order_type != OrderType::Market {
        info!(order_type = %request.order_type, "Rejecting unsupported order type");
        return Ok(Json(ExecuteOrderResponse::unsupported_type()));
    }

    let order = Order::new(
        request.order_type,
        request.token_in,
        request.token_out,
        request.amount_in,
        request.slippage,
    );

    let order = state.store.create(order).await.map_err(|err| {
        error!(error = %err, "Failed to persist new order");
        internal_error("STORAGE_ERROR", "Failed to persist order")
    })?;

    state
        .queue
        .enqueue(ExecuteOrderJob::new(order.id))
        .await
        .map_err(|err| {
            error!(order_id = %order.id, error = %err, "Failed to enqueue order");
            internal_error("QUEUE_ERROR", "Failed to enqueue order for execution")
        })?;

    info!(order_id = %order.id, "Order accepted and enqueued");
    Ok(Json(ExecuteOrderResponse::accepted(order.id)))
}

/// `GET /api/orders/:id`
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> std::result::Result<Json<ApiOrder>, ApiError> {
    let order_id = Uuid::parse_str(&id).map_err(|_| {
        bad_request(format!("'{}' is not a valid order id", id))
    })?;

    match state.store.find_by_id(order_id).await {
        Ok(order) => Ok(Json(ApiOrder::from(order))),
        Err(OmsError::NotFound(_)) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                "ORDER_NOT_FOUND",
                format!("Order {} not found", order_id),
            )),
        )),
        Err(err) => {
            error!(%order_id, error = %err, "Failed to load order");
            Err(internal_error("STORAGE_ERROR", "Failed to load order"))
        }
    }
}

/// `GET /health`
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.service_name.clone(),
    })
}
