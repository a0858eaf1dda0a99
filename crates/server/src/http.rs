//! HTTP server built on Axum
//!
//! Wraps an Axum router with listener binding and graceful shutdown
//! driven by a `CancellationToken`.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Router;
use parking_lot::RwLock;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::{Result, ServerError};

/// HTTP server hosting the order API and WebSocket endpoint
#[derive(Clone)]
pub struct HttpServer {
    addr: String,
    router: Router,
    running: Arc<AtomicBool>,
    bound_addr: Arc<RwLock<Option<SocketAddr>>>,
}

impl HttpServer {
    pub fn new(host: impl Into<String>, port: u16, router: Router) -> Self {
        Self {
            addr: format!("{}:{}", host.into(), port),
            router,
            running: Arc::new(AtomicBool::new(false)),
            bound_addr: Arc::new(RwLock::new(None)),
        }
    }

    /// The address actually bound, once the server is running
    ///
    /// Useful with port 0, where the OS picks an ephemeral port.
    pub fn address(&self) -> Option<SocketAddr> {
        *self.bound_addr.read()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Serve until the token is cancelled, then drain in-flight requests
    pub async fn run(&self, shutdown_token: CancellationToken) -> Result<()> {
        let addr: SocketAddr = self
            .addr
            .parse()
            .map_err(|_| ServerError::InvalidAddress(self.addr.clone()))?;

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::bind(addr.to_string(), e))?;

        let local_addr = listener.local_addr().map_err(ServerError::Io)?;
        *self.bound_addr.write() = Some(local_addr);
        self.running.store(true, Ordering::SeqCst);

        info!(%local_addr, "HTTP server listening");

        let result = axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(async move {
                shutdown_token.cancelled().await;
                info!("HTTP server received shutdown signal");
            })
            .await;

        self.running.store(false, Ordering::SeqCst);
        *self.bound_addr.write() = None;

        match result {
            Ok(()) => {
                info!("HTTP server shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!(%e, "HTTP server error");
                Err(ServerError::Io(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_http_server_shutdown() {
        let router = Router::new().route("/", axum::routing::get(|| async { "ok" }));
        let server = HttpServer::new("127.0.0.1", 0, router);

        let token = CancellationToken::new();
        let run_server = server.clone();
        let run_token = token.clone();
        let handle = tokio::spawn(async move { run_server.run(run_token).await });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(server.is_running());
        assert!(server.address().is_some());

        token.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(result.is_ok(), "Server should shutdown within timeout");
    }

    #[tokio::test]
    async fn test_invalid_address_is_rejected() {
        let server = HttpServer::new("not an address", 0, Router::new());
        let result = server.run(CancellationToken::new()).await;
        assert!(matches!(result, Err(ServerError::InvalidAddress(_))));
    }
}
