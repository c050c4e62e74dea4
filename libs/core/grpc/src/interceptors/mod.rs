/// Re-export tonic's Interceptor trait for convenience
pub use tonic::service::Interceptor;

pub mod auth;
pub mod gate;

pub use auth::AuthInterceptor;
pub use gate::BearerAuth;
