use std::fmt;
use std::sync::Arc;
use tonic::metadata::MetadataMap;
use tonic::{Request, Status};

const AUTHORIZATION: &str = "authorization";
const BEARER_PREFIX: &str = "Bearer ";

/// Server interceptor admitting only calls that present the expected bearer token
///
/// The expected token is captured at construction and never echoed back in
/// rejection messages or `Debug` output.
///
/// # Example
/// ```ignore
/// use grpc_client::BearerAuth;
/// use rpc::todo::v1::todo_service_server::TodoServiceServer;
///
/// let svc = TodoServiceServer::with_interceptor(handler, BearerAuth::new("token"));
/// ```
#[derive(Clone)]
pub struct BearerAuth {
    expected: Arc<str>,
}

impl BearerAuth {
    pub fn new(expected: impl AsRef<str>) -> Self {
        Self {
            expected: Arc::from(expected.as_ref()),
        }
    }

    /// Decide whether a call carrying `metadata` may reach the handler.
    pub fn authorize(&self, metadata: &MetadataMap) -> Result<(), Status> {
        if metadata.is_empty() {
            return Err(Status::unauthenticated("no metadata"));
        }

        let value = metadata
            .get(AUTHORIZATION)
            .ok_or_else(|| Status::unauthenticated("no auth token"))?;

        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix(BEARER_PREFIX))
            .ok_or_else(|| Status::unauthenticated("invalid auth token"))?;

        if token != &*self.expected {
            return Err(Status::unauthenticated("invalid auth token"));
        }

        Ok(())
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth")
            .field("expected", &"<redacted>")
            .finish()
    }
}

impl tonic::service::Interceptor for BearerAuth {
    fn call(&mut self, request: Request<()>) -> Result<Request<()>, Status> {
        if let Err(status) = self.authorize(request.metadata()) {
            tracing::debug!(reason = status.message(), "Rejected unauthenticated call");
            return Err(status);
        }
        Ok(request)
    }
}
