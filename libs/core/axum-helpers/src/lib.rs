//! # Axum Helpers
//!
//! - **[`server`]**: router assembly, health endpoint, shutdown signal
//! - **[`errors`]**: structured error responses with error codes

pub mod errors;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use server::{HealthResponse, create_router, health_router, shutdown_signal};
