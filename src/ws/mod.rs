//! WebSocket layer: upgrade handling and per-session lifecycle.
//!
//! The endpoint at `/ws` accepts a session, registers it with the
//! [`crate::domain::ConnectionRegistry`], and delivers the `update` token
//! after every successful write. Inbound messages are logged and ignored.

pub mod connection;
pub mod handler;
