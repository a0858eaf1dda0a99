//! HTTP and WebSocket surface for DexFlow
//!
//! This crate exposes the public API of the execution engine:
//!
//! - `POST /api/orders/execute` - accept an order and enqueue it
//! - `GET /api/orders/:id` - fetch the current order state
//! - `GET /ws?orderId=...` - stream status updates for one order
//! - `GET /health` - liveness probe
//!
//! Shutdown coordination uses `CancellationToken` from `tokio_util`:
//! cancelling the token passed to [`HttpServer::run`] drains in-flight
//! requests and stops the listener.

pub mod error;
pub mod handlers;
pub mod http;
pub mod models;
pub mod routes;
pub mod shutdown;
pub mod state;
pub mod ws;

pub use error::{Result, ServerError};
pub use http::HttpServer;
pub use routes::create_router;
pub use shutdown::ShutdownController;
pub use state::AppState;
