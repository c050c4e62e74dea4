use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
    pub version: String,
}

/// `GET /health` answering `{"status":"ok","name","version"}`.
///
/// Liveness only: it does not reach the store or any upstream.
pub fn health_router<S>(name: &'static str, version: &'static str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/health",
        get(move || async move {
            Json(HealthResponse {
                status: "ok".to_string(),
                name: name.to_string(),
                version: version.to_string(),
            })
        }),
    )
}
