//! OpenAPI document and optional Swagger UI.

use utoipa::OpenApi;

use crate::api::dto::{BlogResponse, CreateBlogRequest, UpdateBlogRequest};
use crate::api::handlers::{blog, system};
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "blog-gateway",
        description = "CRUD API for blog posts. Connect to `/ws` to receive `update` after every successful write."
    ),
    paths(
        blog::list_blogs,
        blog::get_blog,
        blog::create_blog,
        blog::update_blog,
        blog::delete_blog,
        system::root_handler,
        system::health_handler,
    ),
    components(schemas(
        BlogResponse,
        CreateBlogRequest,
        UpdateBlogRequest,
        ErrorResponse,
        ErrorBody,
        system::HealthResponse,
    )),
    tags(
        (name = "Blogs", description = "Blog post CRUD"),
        (name = "System", description = "Liveness and health"),
    )
)]
pub struct ApiDoc;

/// Swagger UI at `/swagger-ui`, serving the document at
/// `/api-docs/openapi.json`.
#[cfg(feature = "swagger-ui")]
pub fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
