//! Shared harness: serves the real router on an ephemeral port.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use blog_gateway::api;
use blog_gateway::app_state::AppState;
use blog_gateway::domain::ConnectionRegistry;
use blog_gateway::persistence::BlogStore;
use blog_gateway::service::BlogService;

/// Origin the test server admits.
pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// A running gateway backed by the in-memory store.
pub struct TestServer {
    pub addr: SocketAddr,
    pub registry: Arc<ConnectionRegistry>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let blog_service = Arc::new(BlogService::new(
            Arc::new(BlogStore::in_memory()),
            Arc::clone(&registry),
        ));
        let state = AppState {
            blog_service,
            registry: Arc::clone(&registry),
            ws_send_buffer: 16,
            allowed_origins: vec![HeaderValue::from_static(ALLOWED_ORIGIN)].into(),
        };
        let app = api::build_app(state);

        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind ephemeral port");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("local addr");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, registry }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Waits until exactly `n` sessions are registered. Registration runs
    /// after the handshake completes, so tests must not race it.
    pub async fn wait_for_sessions(&self, n: usize) {
        for _ in 0..200 {
            if self.registry.len().await == n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {n} sessions, have {}",
            self.registry.len().await
        );
    }
}
