//! WebSocket session lifecycle.
//!
//! A session is registered on upgrade, then runs two halves until either
//! ends: a writer draining the session's outbox onto the socket and a
//! reader that only watches for closure. Whichever half finishes first
//! decides the [`SessionEnd`]; the session then unregisters exactly once.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ConnectionId, ConnectionRegistry};

/// Why a session stopped.
#[derive(Debug)]
pub enum SessionEnd {
    /// The client sent a close frame.
    ClientClosed,
    /// The inbound stream ended without a close frame.
    StreamEnded,
    /// Reading from the socket failed.
    ReadError(axum::Error),
    /// Writing to the socket failed.
    WriteError(axum::Error),
    /// The registry dropped the outbox (eviction or shutdown).
    OutboxClosed,
    /// A session half panicked or was cancelled.
    Aborted(String),
}

/// Runs one WebSocket session from registration to teardown.
pub async fn run_connection(
    socket: WebSocket,
    registry: Arc<ConnectionRegistry>,
    capacity: usize,
) {
    let id = ConnectionId::new();
    let (outbox, inbox) = mpsc::channel(capacity);
    if !registry.register(id, outbox).await {
        return;
    }
    tracing::info!(connection_id = %id, "ws session opened");

    let (ws_tx, ws_rx) = socket.split();
    let mut writer = tokio::spawn(write_loop(ws_tx, inbox));
    let mut reader = tokio::spawn(read_loop(ws_rx, id));

    let end = tokio::select! {
        res = &mut writer => {
            reader.abort();
            res.unwrap_or_else(|e| SessionEnd::Aborted(e.to_string()))
        }
        res = &mut reader => {
            writer.abort();
            res.unwrap_or_else(|e| SessionEnd::Aborted(e.to_string()))
        }
    };

    registry.unregister(id).await;

    match &end {
        SessionEnd::ClientClosed | SessionEnd::StreamEnded | SessionEnd::OutboxClosed => {
            tracing::info!(connection_id = %id, reason = ?end, "ws session closed");
        }
        SessionEnd::ReadError(_) | SessionEnd::WriteError(_) | SessionEnd::Aborted(_) => {
            tracing::warn!(connection_id = %id, reason = ?end, "ws session closed with error");
        }
    }
}

/// Forwards queued notifications to the client as text frames.
async fn write_loop(
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut inbox: mpsc::Receiver<Arc<str>>,
) -> SessionEnd {
    while let Some(token) = inbox.recv().await {
        if let Err(e) = ws_tx.send(Message::text(token.to_string())).await {
            return SessionEnd::WriteError(e);
        }
    }
    // Outbox gone: tell the client before dropping the socket.
    if let Err(e) = ws_tx.send(Message::Close(None)).await {
        tracing::debug!(error = %e, "close frame not delivered");
    }
    SessionEnd::OutboxClosed
}

/// Reads and discards inbound frames until the client goes away.
async fn read_loop(mut ws_rx: SplitStream<WebSocket>, id: ConnectionId) -> SessionEnd {
    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                tracing::debug!(connection_id = %id, payload = text.as_str(), "message from client");
            }
            Ok(Message::Binary(bytes)) => {
                tracing::debug!(connection_id = %id, len = bytes.len(), "binary message from client");
            }
            Ok(Message::Close(_)) => return SessionEnd::ClientClosed,
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Err(e) => return SessionEnd::ReadError(e),
        }
    }
    SessionEnd::StreamEnded
}
