//! Blog DTOs for create, update, and read operations.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::domain::{Blog, BlogPatch};
use crate::error::GatewayError;

/// Request body for `POST /api/blog/`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBlogRequest {
    /// Unique title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Optional cover image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CreateBlogRequest {
    /// Converts the request into a validated [`Blog`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the title is blank.
    pub fn into_blog(self) -> Result<Blog, GatewayError> {
        Blog::new(self.title, self.content, self.image_url)
    }
}

/// Request body for `PUT /api/blog/{title}/`.
///
/// Each field distinguishes "absent" (outer `None`, left unchanged) from
/// "present" (outer `Some`). A present `null` is only meaningful for
/// `image_url`, where it clears the value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBlogRequest {
    /// New title.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    /// New content.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub content: Option<Option<String>>,
    /// New image URL, or `null` to clear it.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
}

impl UpdateBlogRequest {
    /// Converts the request into a [`BlogPatch`] holding only the supplied
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `title` or `content` is
    /// explicitly `null`.
    pub fn into_patch(self) -> Result<BlogPatch, GatewayError> {
        Ok(BlogPatch {
            title: required("title", self.title)?,
            content: required("content", self.content)?,
            image_url: self.image_url,
        })
    }
}

fn required(field: &str, value: Option<Option<String>>) -> Result<Option<String>, GatewayError> {
    match value {
        None => Ok(None),
        Some(Some(v)) => Ok(Some(v)),
        Some(None) => Err(GatewayError::InvalidRequest(format!(
            "{field} must not be null"
        ))),
    }
}

/// Marks a field as present whenever its key appears, even with `null`.
/// Combined with `#[serde(default)]`, a missing key stays `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A blog post as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BlogResponse {
    /// Unique title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Cover image URL, `null` when unset.
    pub image_url: Option<String>,
}

impl From<Blog> for BlogResponse {
    fn from(blog: Blog) -> Self {
        Self {
            title: blog.title,
            content: blog.content,
            image_url: blog.image_url,
        }
    }
}
