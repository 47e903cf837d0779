//! Domain layer: blog post model and the real-time session registry.
//!
//! This module contains the blog post record and its partial-update patch,
//! the session identifier, and the connection registry that fans out
//! change notifications to every open WebSocket session.

pub mod blog;
pub mod connection_id;
pub mod connection_registry;

pub use blog::{Blog, BlogPatch};
pub use connection_id::ConnectionId;
pub use connection_registry::{BroadcastReport, ConnectionRegistry, Outbox};
