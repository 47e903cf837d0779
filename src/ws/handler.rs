//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};

use super::connection::run_connection;
use crate::api::origin_allowed;
use crate::app_state::AppState;
use crate::error::GatewayError;

/// `GET /ws`: Upgrade HTTP connection to WebSocket.
///
/// Browser handshakes must carry an `Origin` on the allow-list. Requests
/// without an `Origin` header are accepted.
///
/// # Errors
///
/// Returns [`GatewayError::OriginForbidden`] for an unlisted origin.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, GatewayError> {
    if let Some(origin) = headers.get(header::ORIGIN)
        && !origin_allowed(&state.allowed_origins, origin)
    {
        let origin = String::from_utf8_lossy(origin.as_bytes()).into_owned();
        tracing::warn!(%origin, "websocket upgrade refused");
        return Err(GatewayError::OriginForbidden(origin));
    }

    let registry = Arc::clone(&state.registry);
    let capacity = state.ws_send_buffer;

    Ok(ws
        .on_upgrade(move |socket| run_connection(socket, registry, capacity))
        .into_response())
}
