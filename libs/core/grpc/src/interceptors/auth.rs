use tonic::metadata::MetadataValue;
use tonic::{Request, Status};

use crate::error::GrpcError;

/// Client interceptor attaching `authorization: Bearer <token>` to every call
///
/// The header value is encoded once at construction.
///
/// # Example
/// ```ignore
/// use grpc_client::interceptors::AuthInterceptor;
/// use rpc::todo::v1::todo_service_client::TodoServiceClient;
///
/// let auth = AuthInterceptor::bearer("my-token")?;
/// let client = TodoServiceClient::with_interceptor(channel, auth);
/// ```
#[derive(Clone)]
pub struct AuthInterceptor {
    header_value: MetadataValue<tonic::metadata::Ascii>,
}

impl AuthInterceptor {
    /// Create an interceptor with a Bearer token
    pub fn bearer(token: impl AsRef<str>) -> Result<Self, GrpcError> {
        let header_value = format!("Bearer {}", token.as_ref())
            .parse()
            .map_err(|_| GrpcError::InvalidMetadata("authorization"))?;
        Ok(Self { header_value })
    }
}

impl std::fmt::Debug for AuthInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthInterceptor").finish_non_exhaustive()
    }
}

impl tonic::service::Interceptor for AuthInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        request
            .metadata_mut()
            .insert("authorization", self.header_value.clone());
        Ok(request)
    }
}
