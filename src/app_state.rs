//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use axum::http::HeaderValue;

use crate::domain::ConnectionRegistry;
use crate::service::BlogService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Blog service for all business logic.
    pub blog_service: Arc<BlogService>,
    /// Registry of open WebSocket sessions.
    pub registry: Arc<ConnectionRegistry>,
    /// Capacity of each new session's outbound queue.
    pub ws_send_buffer: usize,
    /// Origins admitted by the CORS policy and the `/ws` upgrade.
    pub allowed_origins: Arc<[HeaderValue]>,
}
