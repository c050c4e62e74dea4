use axum::response::Response;

use super::{ErrorCode, error_response};
use axum::http::StatusCode;

/// Fallback handler for unknown routes
pub async fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorCode::NotFound.default_message().to_string(),
        ErrorCode::NotFound,
    )
}
