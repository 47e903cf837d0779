//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Blog endpoints are mounted under `/api`; `/`, `/health`, and `/ws` sit
//! at the root.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the served application: REST routes, the `/ws` upgrade endpoint,
/// request tracing, and the CORS policy.
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.allowed_origins);
    let router = Router::new()
        .merge(build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(openapi::swagger_ui());

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS policy: listed origins only, credentials allowed, any method and
/// header mirrored back. A `*` entry admits every origin.
pub fn cors_layer(allowed_origins: &[HeaderValue]) -> CorsLayer {
    let origin = if admits_any_origin(allowed_origins) {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(allowed_origins.iter().cloned())
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Returns `true` if `origin` passes the allow-list.
pub fn origin_allowed(allowed_origins: &[HeaderValue], origin: &HeaderValue) -> bool {
    admits_any_origin(allowed_origins) || allowed_origins.contains(origin)
}

fn admits_any_origin(allowed_origins: &[HeaderValue]) -> bool {
    allowed_origins.iter().any(|o| o == "*")
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::api::dto::BlogResponse;
    use crate::domain::ConnectionRegistry;
    use crate::persistence::BlogStore;
    use crate::service::BlogService;

    const ORIGIN: &str = "http://localhost:3000";

    fn make_app() -> Router {
        make_app_with_origins(&[HeaderValue::from_static(ORIGIN)])
    }

    fn make_app_with_origins(origins: &[HeaderValue]) -> Router {
        let registry = Arc::new(ConnectionRegistry::new());
        let blog_service = Arc::new(BlogService::new(
            Arc::new(BlogStore::in_memory()),
            Arc::clone(&registry),
        ));
        let state = AppState {
            blog_service,
            registry,
            ws_send_buffer: 8,
            allowed_origins: origins.into(),
        };
        build_app(state)
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        let Ok(req) = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
        else {
            panic!("valid request");
        };
        req
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        let Ok(req) = Request::builder().method(method).uri(uri).body(Body::empty()) else {
            panic!("valid request");
        };
        req
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let Ok(response) = app.clone().oneshot(req).await else {
            panic!("router is infallible");
        };
        let status = response.status();
        let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
            panic!("readable body");
        };
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn root_says_hello() {
        let app = make_app();
        let (status, body) = send(&app, empty_request(Method::GET, "/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"Hello": "World"}));
    }

    #[tokio::test]
    async fn crud_scenario() {
        let app = make_app();

        let (status, body) = send(
            &app,
            json_request(Method::POST, "/api/blog/", r#"{"title":"A","content":"hi"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"title": "A", "content": "hi", "image_url": null})
        );

        let (status, body) = send(&app, empty_request(Method::GET, "/api/blog/A")).await;
        assert_eq!(status, StatusCode::OK);
        let Ok(fetched) = serde_json::from_value::<BlogResponse>(body) else {
            panic!("blog body");
        };
        assert_eq!(fetched.content, "hi");

        let (status, body) = send(
            &app,
            json_request(Method::PUT, "/api/blog/A/", r#"{"content":"bye"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"title": "A", "content": "bye", "image_url": null})
        );

        let (status, body) = send(&app, empty_request(Method::DELETE, "/api/blog/A")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!("Successfully deleted blog"));

        let (status, body) = send(&app, empty_request(Method::GET, "/api/blog/A")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], 2001);
    }

    #[tokio::test]
    async fn missing_title_yields_404_on_every_verb() {
        let app = make_app();
        let (status, _) = send(&app, empty_request(Method::GET, "/api/blog/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(
            &app,
            json_request(Method::PUT, "/api/blog/nope/", r#"{"content":"x"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, body) = send(&app, empty_request(Method::DELETE, "/api/blog/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"]["message"],
            "There is no blog with the title nope"
        );
    }

    #[tokio::test]
    async fn malformed_create_body_is_400() {
        let app = make_app();
        let (status, body) = send(
            &app,
            json_request(Method::POST, "/api/blog/", r#"{"title":"A"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 1001);

        let (status, _) = send(&app, json_request(Method::POST, "/api/blog/", "not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_create_is_400() {
        let app = make_app();
        let body = r#"{"title":"A","content":"hi"}"#;
        let (status, _) = send(&app, json_request(Method::POST, "/api/blog/", body)).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(&app, json_request(Method::POST, "/api/blog/", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 1002);
    }

    #[tokio::test]
    async fn list_returns_all_posts() {
        let app = make_app();
        for title in ["one", "two"] {
            let body = format!(r#"{{"title":"{title}","content":"c"}}"#);
            let (status, _) = send(&app, json_request(Method::POST, "/api/blog/", &body)).await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, body) = send(&app, empty_request(Method::GET, "/api/blogs")).await;
        assert_eq!(status, StatusCode::OK);
        let Ok(list) = serde_json::from_value::<Vec<BlogResponse>>(body) else {
            panic!("list body");
        };
        assert_eq!(list.len(), 2);
    }

    #[tokio::test]
    async fn cors_allows_configured_origin_with_credentials() {
        let app = make_app();
        let Ok(req) = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/blogs")
            .header(header::ORIGIN, ORIGIN)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
            .body(Body::empty())
        else {
            panic!("valid request");
        };
        let Ok(response) = app.oneshot(req).await else {
            panic!("router is infallible");
        };
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static(ORIGIN))
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
            Some(&HeaderValue::from_static("true"))
        );
    }

    #[tokio::test]
    async fn cors_rejects_unlisted_origin() {
        let app = make_app();
        let Ok(req) = Request::builder()
            .method(Method::GET)
            .uri("/")
            .header(header::ORIGIN, "http://evil.test")
            .body(Body::empty())
        else {
            panic!("valid request");
        };
        let Ok(response) = app.oneshot(req).await else {
            panic!("router is infallible");
        };
        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }

    #[tokio::test]
    async fn wildcard_entry_echoes_any_origin_with_credentials() {
        let app = make_app_with_origins(&[HeaderValue::from_static("*")]);
        let Ok(req) = Request::builder()
            .method(Method::GET)
            .uri("/")
            .header(header::ORIGIN, "http://anywhere.test")
            .body(Body::empty())
        else {
            panic!("valid request");
        };
        let Ok(response) = app.oneshot(req).await else {
            panic!("router is infallible");
        };
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("http://anywhere.test"))
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
            Some(&HeaderValue::from_static("true"))
        );
    }

    #[test]
    fn origin_allowed_checks_list_and_wildcard() {
        let listed = [HeaderValue::from_static(ORIGIN)];
        assert!(origin_allowed(&listed, &HeaderValue::from_static(ORIGIN)));
        assert!(!origin_allowed(
            &listed,
            &HeaderValue::from_static("http://evil.test")
        ));
        let any = [HeaderValue::from_static("*")];
        assert!(origin_allowed(
            &any,
            &HeaderValue::from_static("http://evil.test")
        ));
    }
}
