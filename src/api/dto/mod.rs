//! Data Transfer Objects for REST request/response serialization.

pub mod blog_dto;

pub use blog_dto::*;
