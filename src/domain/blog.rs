//! Blog post record and partial-update patch.

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// A blog post, uniquely identified by its `title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    /// Unique title; the primary key of the collection.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Optional cover image URL.
    pub image_url: Option<String>,
}

impl Blog {
    /// Builds a post after checking the title is usable as a key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `title` is blank.
    pub fn new(
        title: String,
        content: String,
        image_url: Option<String>,
    ) -> Result<Self, GatewayError> {
        validate_title(&title)?;
        Ok(Self {
            title,
            content,
            image_url,
        })
    }

    /// Applies `patch` in place. Absent fields are left unchanged.
    pub fn apply(&mut self, patch: &BlogPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
        if let Some(image_url) = &patch.image_url {
            self.image_url.clone_from(image_url);
        }
    }
}

/// Partial update for a [`Blog`].
///
/// `None` means the field was not supplied and must not be touched. For
/// `image_url`, `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogPatch {
    /// New title, if renaming.
    pub title: Option<String>,
    /// New content.
    pub content: Option<String>,
    /// New image URL, or `Some(None)` to clear it.
    pub image_url: Option<Option<String>>,
}

impl BlogPatch {
    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.image_url.is_none()
    }

    /// Checks the patch before it is sent to the store.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the patch sets no field or
    /// renames the post to a blank title.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "update body contains no fields".to_string(),
            ));
        }
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), GatewayError> {
    if title.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "title must not be empty".to_string(),
        ));
    }
    Ok(())
}
