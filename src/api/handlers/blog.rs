//! Blog CRUD handlers: list, get, create, update, delete.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::api::dto::{BlogResponse, CreateBlogRequest, UpdateBlogRequest};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// Body returned by a successful delete.
pub const DELETE_SUCCESS_MESSAGE: &str = "Successfully deleted blog";

/// `GET /api/blogs`: List every blog post.
///
/// # Errors
///
/// Returns [`GatewayError`] if the store fails.
#[utoipa::path(
    get,
    path = "/api/blogs",
    tag = "Blogs",
    summary = "List blog posts",
    responses(
        (status = 200, description = "All blog posts", body = Vec<BlogResponse>),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_blogs(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogResponse>>, GatewayError> {
    let blogs = state.blog_service.list_blogs().await?;
    Ok(Json(blogs.into_iter().map(BlogResponse::from).collect()))
}

/// `GET /api/blog/{title}`: Get one blog post.
///
/// # Errors
///
/// Returns [`GatewayError::BlogNotFound`] if the post does not exist.
#[utoipa::path(
    get,
    path = "/api/blog/{title}",
    tag = "Blogs",
    summary = "Get a blog post",
    params(
        ("title" = String, Path, description = "Blog title"),
    ),
    responses(
        (status = 200, description = "Blog post", body = BlogResponse),
        (status = 404, description = "Blog not found", body = ErrorResponse),
    )
)]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<BlogResponse>, GatewayError> {
    let blog = state.blog_service.get_blog(&title).await?;
    Ok(Json(blog.into()))
}

/// `POST /api/blog/`: Create a blog post.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on a malformed body or
/// [`GatewayError::TitleTaken`] if the title is in use.
#[utoipa::path(
    post,
    path = "/api/blog/",
    tag = "Blogs",
    summary = "Create a blog post",
    description = "Creates a post and sends `update` to every open WebSocket session.",
    request_body = CreateBlogRequest,
    responses(
        (status = 200, description = "Blog created", body = BlogResponse),
        (status = 400, description = "Invalid body or duplicate title", body = ErrorResponse),
    )
)]
pub async fn create_blog(
    State(state): State<AppState>,
    payload: Result<Json<CreateBlogRequest>, JsonRejection>,
) -> Result<Json<BlogResponse>, GatewayError> {
    let Json(req) = payload?;
    let blog = req.into_blog()?;
    let created = state.blog_service.create_blog(blog).await?;
    Ok(Json(created.into()))
}

/// `PUT /api/blog/{title}/`: Partially update a blog post.
///
/// # Errors
///
/// Returns [`GatewayError::BlogNotFound`] if the post does not exist, or
/// [`GatewayError::InvalidRequest`] on a malformed body.
#[utoipa::path(
    put,
    path = "/api/blog/{title}/",
    tag = "Blogs",
    summary = "Update a blog post",
    description = "Sets only the fields present in the body and sends `update` to every open WebSocket session.",
    params(
        ("title" = String, Path, description = "Current blog title"),
    ),
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Blog updated", body = BlogResponse),
        (status = 400, description = "Invalid body or title conflict", body = ErrorResponse),
        (status = 404, description = "Blog not found", body = ErrorResponse),
    )
)]
pub async fn update_blog(
    State(state): State<AppState>,
    Path(title): Path<String>,
    payload: Result<Json<UpdateBlogRequest>, JsonRejection>,
) -> Result<Json<BlogResponse>, GatewayError> {
    let Json(req) = payload?;
    let patch = req.into_patch()?;
    let updated = state.blog_service.update_blog(&title, patch).await?;
    Ok(Json(updated.into()))
}

/// `DELETE /api/blog/{title}`: Delete a blog post.
///
/// # Errors
///
/// Returns [`GatewayError::BlogNotFound`] if the post does not exist.
#[utoipa::path(
    delete,
    path = "/api/blog/{title}",
    tag = "Blogs",
    summary = "Delete a blog post",
    description = "Removes the post and sends `update` to every open WebSocket session.",
    params(
        ("title" = String, Path, description = "Blog title"),
    ),
    responses(
        (status = 200, description = "Blog deleted", body = String),
        (status = 404, description = "Blog not found", body = ErrorResponse),
    )
)]
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<&'static str>, GatewayError> {
    state.blog_service.delete_blog(&title).await?;
    Ok(Json(DELETE_SUCCESS_MESSAGE))
}

/// Blog routes, mounted under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(list_blogs))
        .route("/blog/", post(create_blog))
        .route("/blog/{title}", get(get_blog).delete(delete_blog))
        .route("/blog/{title}/", put(update_blog))
}
