//! Persistence layer: the blog post document store.
//!
//! [`BlogStore`] is the single gateway the service talks to. It issues
//! get/list/insert/update/delete against one collection keyed by `title`,
//! backed either by PostgreSQL (`sqlx::PgPool`) or by process memory.

pub mod memory;
pub mod postgres;

pub use memory::MemoryBlogStore;
pub use postgres::PostgresBlogStore;

use crate::domain::{Blog, BlogPatch};
use crate::error::GatewayError;

/// Blog post store, dispatching to the configured backend.
#[derive(Debug)]
pub enum BlogStore {
    /// Durable PostgreSQL table.
    Postgres(PostgresBlogStore),
    /// Process-lifetime store.
    Memory(MemoryBlogStore),
}

impl BlogStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::Memory(MemoryBlogStore::new())
    }

    /// Returns the backend name for logging.
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    /// Fetches the post with the given title.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on backend failure.
    pub async fn get(&self, title: &str) -> Result<Option<Blog>, GatewayError> {
        match self {
            Self::Postgres(store) => store.get(title).await,
            Self::Memory(store) => Ok(store.get(title).await),
        }
    }

    /// Lists every post.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on backend failure.
    pub async fn list(&self) -> Result<Vec<Blog>, GatewayError> {
        match self {
            Self::Postgres(store) => store.list().await,
            Self::Memory(store) => Ok(store.list().await),
        }
    }

    /// Inserts a new post. Returns `None` if nothing was inserted.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on backend failure.
    pub async fn insert(&self, blog: &Blog) -> Result<Option<Blog>, GatewayError> {
        match self {
            Self::Postgres(store) => store.insert(blog).await,
            Self::Memory(store) => Ok(store.insert(blog).await),
        }
    }

    /// Applies a partial update. Returns `None` if the title is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TitleTaken`] on a rename collision, or a
    /// [`GatewayError::PersistenceError`] on backend failure.
    pub async fn update(
        &self,
        title: &str,
        patch: &BlogPatch,
    ) -> Result<Option<Blog>, GatewayError> {
        match self {
            Self::Postgres(store) => store.update(title, patch).await,
            Self::Memory(store) => store.update(title, patch).await,
        }
    }

    /// Deletes a post. Returns `false` if the title is unknown.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on backend failure.
    pub async fn delete(&self, title: &str) -> Result<bool, GatewayError> {
        match self {
            Self::Postgres(store) => store.delete(title).await,
            Self::Memory(store) => Ok(store.delete(title).await),
        }
    }
}
