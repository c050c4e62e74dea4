use database::DatabaseError;
use grpc_client::GrpcError;
use thiserror::Error;

/// Fatal errors raised while assembling or starting the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    BindFailure {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Storage(#[from] DatabaseError),

    #[error("upstream channel: {0}")]
    Upstream(#[from] GrpcError),

    #[error("lifecycle: {0}")]
    Lifecycle(String),
}

pub type ServerResult<T> = Result<T, ServerError>;
