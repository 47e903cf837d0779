//! Registry of open real-time sessions with best-effort broadcast.
//!
//! [`ConnectionRegistry`] maps each [`ConnectionId`] to the bounded outbox
//! feeding that session's WebSocket writer. Handlers call
//! [`ConnectionRegistry::broadcast`] after every successful mutation and
//! session tasks call [`ConnectionRegistry::unregister`] when they end.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::sync::mpsc::{self, error::TrySendError};

use super::ConnectionId;

/// Sending half of a session's outbound queue.
pub type Outbox = mpsc::Sender<Arc<str>>;

/// Outcome of a single [`ConnectionRegistry::broadcast`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Sessions whose outbox accepted the message.
    pub delivered: usize,
    /// Sessions whose outbox was full or closed; these were evicted.
    pub dropped: usize,
}

/// In-memory set of open sessions.
///
/// # Concurrency
///
/// - `register`/`unregister` take the write lock for a single map operation.
/// - `broadcast` clones the outboxes under the read lock, releases it, then
///   sends. Sessions joining or leaving mid-broadcast never disturb the
///   iteration; a session registered after the snapshot misses that message
///   only.
/// - Sends use `try_send`, so one slow or dead session cannot hold up the
///   others.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    sessions: RwLock<HashMap<ConnectionId, Outbox>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a session. Returns `false` and keeps the existing entry if `id`
    /// is already registered.
    pub async fn register(&self, id: ConnectionId, outbox: Outbox) -> bool {
        let mut map = self.sessions.write().await;
        if map.contains_key(&id) {
            tracing::warn!(connection_id = %id, "session already registered");
            return false;
        }
        map.insert(id, outbox);
        tracing::debug!(connection_id = %id, active = map.len(), "session registered");
        true
    }

    /// Removes a session. Returns `false` if it was already gone.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let mut map = self.sessions.write().await;
        let removed = map.remove(&id).is_some();
        if removed {
            tracing::debug!(connection_id = %id, active = map.len(), "session unregistered");
        }
        removed
    }

    /// Queues `message` for every registered session.
    ///
    /// Never fails. Sessions that cannot accept the message are logged and
    /// evicted; dropping their outbox ends their writer.
    pub async fn broadcast(&self, message: &str) -> BroadcastReport {
        let snapshot: Vec<(ConnectionId, Outbox)> = {
            let map = self.sessions.read().await;
            map.iter().map(|(id, tx)| (*id, tx.clone())).collect()
        };
        let total = snapshot.len();
        let message: Arc<str> = Arc::from(message);

        let mut failed = Vec::new();
        for (id, outbox) in snapshot {
            match outbox.try_send(Arc::clone(&message)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(connection_id = %id, "session outbox full, evicting");
                    failed.push(id);
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(connection_id = %id, "session outbox closed, evicting");
                    failed.push(id);
                }
            }
        }

        if !failed.is_empty() {
            let mut map = self.sessions.write().await;
            for id in &failed {
                map.remove(id);
            }
        }

        let report = BroadcastReport {
            delivered: total - failed.len(),
            dropped: failed.len(),
        };
        tracing::debug!(
            token = &*message,
            delivered = report.delivered,
            dropped = report.dropped,
            "broadcast sent"
        );
        report
    }

    /// Drops every session. Returns how many were open.
    pub async fn close_all(&self) -> usize {
        let mut map = self.sessions.write().await;
        let count = map.len();
        map.clear();
        count
    }

    /// Returns the number of open sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no session is open.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
