//! In-memory blog store.
//!
//! Used when persistence is disabled and by the test suites. Posts are kept
//! in insertion order so `list` matches the PostgreSQL `created_at` order.

use tokio::sync::RwLock;

use crate::domain::{Blog, BlogPatch};
use crate::error::GatewayError;

/// Process-local blog store guarded by a single lock.
#[derive(Debug, Default)]
pub struct MemoryBlogStore {
    blogs: RwLock<Vec<Blog>>,
}

impl MemoryBlogStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the post with the given title.
    pub async fn get(&self, title: &str) -> Option<Blog> {
        let blogs = self.blogs.read().await;
        blogs.iter().find(|b| b.title == title).cloned()
    }

    /// Lists every post in insertion order.
    pub async fn list(&self) -> Vec<Blog> {
        self.blogs.read().await.clone()
    }

    /// Inserts a new post. Returns `None` if the title is already taken.
    pub async fn insert(&self, blog: &Blog) -> Option<Blog> {
        let mut blogs = self.blogs.write().await;
        if blogs.iter().any(|b| b.title == blog.title) {
            return None;
        }
        blogs.push(blog.clone());
        Some(blog.clone())
    }

    /// Applies `patch` to the post with the given title.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TitleTaken`] if the patch renames onto the
    /// title of another post.
    pub async fn update(
        &self,
        title: &str,
        patch: &BlogPatch,
    ) -> Result<Option<Blog>, GatewayError> {
        let mut blogs = self.blogs.write().await;
        let Some(index) = blogs.iter().position(|b| b.title == title) else {
            return Ok(None);
        };
        if let Some(new_title) = &patch.title
            && new_title != title
            && blogs.iter().any(|b| &b.title == new_title)
        {
            return Err(GatewayError::TitleTaken(new_title.clone()));
        }

        let Some(blog) = blogs.get_mut(index) else {
            return Ok(None);
        };
        blog.apply(patch);
        Ok(Some(blog.clone()))
    }

    /// Deletes the post with the given title. Returns `false` if it did not
    /// exist.
    pub async fn delete(&self, title: &str) -> bool {
        let mut blogs = self.blogs.write().await;
        let before = blogs.len();
        blogs.retain(|b| b.title != title);
        blogs.len() != before
    }
}
