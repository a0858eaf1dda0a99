//! WebSocket endpoint streaming order status updates
//!
//! Clients connect with `GET /ws?orderId=<uuid>` and receive each
//! lifecycle event for that order as a JSON text frame. There is no
//! replay: events emitted before the connection was established are
//! not resent.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WsParams {
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
}

/// `GET /ws?orderId=...`
///
/// Rejects the request before the upgrade when the order id is missing
/// or malformed.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let order_id = match params.order_id.as_deref().map(Uuid::parse_str) {
        Some(Ok(order_id)) => order_id,
        Some(Err(_)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    "INVALID_ORDER_ID",
                    "Query parameter 'orderId' must be a valid UUID",
                )),
            )
                .into_response();
        }
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    "MISSING_ORDER_ID",
                    "Query parameter 'orderId' is required",
                )),
            )
                .into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, order_id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, order_id: Uuid) {
    let (subscriber, mut events) = state.broadcaster.subscribe(order_id);
    info!(%order_id, subscriber, "WebSocket client connected");

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            payload = events.recv() => {
                let Some(payload) = payload else { break };
                if sink.send(Message::Text(payload)).await.is_err() {
                    break;
                }
            }
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Inbound frames carry no meaning on this endpoint
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.broadcaster.unsubscribe(order_id, subscriber);
    debug!(%order_id, subscriber, "WebSocket client disconnected");
}
