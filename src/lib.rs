//! # blog-gateway
//!
//! REST API and WebSocket change-notification gateway for a blog post
//! store.
//!
//! Posts are created, read, updated, and deleted over HTTP. Every
//! successful write sends the token `update` to each open WebSocket
//! session; clients then re-fetch through the read endpoints.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── BlogService (service/)
//!     ├── ConnectionRegistry (domain/)
//!     │
//!     └── BlogStore (persistence/): PostgreSQL or in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
