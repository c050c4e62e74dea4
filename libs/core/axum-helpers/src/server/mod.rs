//! Server infrastructure: router assembly, health endpoint, shutdown signal.

pub mod health;
pub mod shutdown;

use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::errors::handlers::not_found;

pub use health::{HealthResponse, health_router};
pub use shutdown::shutdown_signal;

/// Wrap application routes with the 404 fallback and request tracing.
///
/// # Example
/// ```ignore
/// let router = create_router(api_routes.merge(health_router("todo", env!("CARGO_PKG_VERSION"))));
/// axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
/// ```
pub fn create_router(routes: Router) -> Router {
    routes.fallback(not_found).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::errors::ErrorResponse;

    #[tokio::test]
    async fn test_health_route() {
        let app = create_router(health_router("todo", "1.2.3"));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.name, "todo");
        assert_eq!(health.version, "1.2.3");
    }

    #[tokio::test]
    async fn test_unknown_route_uses_error_body() {
        let app = create_router(Router::new());

        let response = app
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "NOT_FOUND");
        assert_eq!(body.code, 1004);
    }
}
