//! Blog service: runs store operations and notifies open sessions.

use std::sync::Arc;

use crate::domain::{Blog, BlogPatch, ConnectionRegistry};
use crate::error::GatewayError;
use crate::persistence::BlogStore;

/// Token sent to every session after a successful mutation.
pub const UPDATE_NOTIFICATION: &str = "update";

/// Orchestration layer for all blog operations.
///
/// Every mutation method follows the pattern: validate → call the store →
/// on success broadcast [`UPDATE_NOTIFICATION`] → return the result. A
/// mutation that returns an error never broadcasts.
#[derive(Debug, Clone)]
pub struct BlogService {
    store: Arc<BlogStore>,
    registry: Arc<ConnectionRegistry>,
}

impl BlogService {
    /// Creates a new `BlogService`.
    #[must_use]
    pub fn new(store: Arc<BlogStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { store, registry }
    }

    /// Returns a reference to the inner [`ConnectionRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Lists every post.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the store fails.
    pub async fn list_blogs(&self) -> Result<Vec<Blog>, GatewayError> {
        self.store.list().await
    }

    /// Fetches one post by title.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BlogNotFound`] if no post has this title.
    pub async fn get_blog(&self, title: &str) -> Result<Blog, GatewayError> {
        self.store
            .get(title)
            .await?
            .ok_or_else(|| GatewayError::BlogNotFound(title.to_string()))
    }

    /// Creates a post and notifies sessions.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TitleTaken`] if the title is in use, or a
    /// store error.
    pub async fn create_blog(&self, blog: Blog) -> Result<Blog, GatewayError> {
        let created = self
            .store
            .insert(&blog)
            .await?
            .ok_or_else(|| GatewayError::TitleTaken(blog.title.clone()))?;

        tracing::info!(title = %created.title, "blog created");
        self.notify().await;
        Ok(created)
    }

    /// Applies a partial update and notifies sessions.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an empty or invalid
    /// patch, [`GatewayError::BlogNotFound`] if no post has this title,
    /// [`GatewayError::TitleTaken`] on a rename collision, or a store error.
    pub async fn update_blog(&self, title: &str, patch: BlogPatch) -> Result<Blog, GatewayError> {
        patch.validate()?;
        let updated = self
            .store
            .update(title, &patch)
            .await?
            .ok_or_else(|| GatewayError::BlogNotFound(title.to_string()))?;

        tracing::info!(title, new_title = %updated.title, "blog updated");
        self.notify().await;
        Ok(updated)
    }

    /// Deletes a post and notifies sessions.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BlogNotFound`] if no post has this title, or
    /// a store error.
    pub async fn delete_blog(&self, title: &str) -> Result<(), GatewayError> {
        if !self.store.delete(title).await? {
            return Err(GatewayError::BlogNotFound(title.to_string()));
        }

        tracing::info!(title, "blog deleted");
        self.notify().await;
        Ok(())
    }

    async fn notify(&self) {
        let report = self.registry.broadcast(UPDATE_NOTIFICATION).await;
        if report.dropped > 0 {
            tracing::warn!(
                delivered = report.delivered,
                dropped = report.dropped,
                "some sessions missed the update notification"
            );
        }
    }
}
