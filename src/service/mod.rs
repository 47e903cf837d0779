//! Service layer: business logic orchestration.
//!
//! [`BlogService`] runs blog operations against the
//! [`super::persistence::BlogStore`] and notifies sessions through the
//! [`super::domain::ConnectionRegistry`].

pub mod blog_service;

pub use blog_service::{BlogService, UPDATE_NOTIFICATION};
