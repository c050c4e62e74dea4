pub mod config;

pub use config::ChannelConfig;

use crate::error::{GrpcError, GrpcResult};
use tonic::transport::{Channel, Endpoint};

/// Creates a gRPC channel with default settings, connecting eagerly
///
/// ## Example
/// ```ignore
/// use grpc_client::create_channel;
/// use rpc::todo::v1::todo_service_client::TodoServiceClient;
///
/// let channel = create_channel("http://127.0.0.1:50051").await?;
/// let client = TodoServiceClient::new(channel);
/// ```
pub async fn create_channel(addr: impl Into<String>) -> GrpcResult<Channel> {
  create_channel_with_config(addr, ChannelConfig::default()).await
}

/// Creates a gRPC channel with custom configuration, connecting eagerly
///
/// Fails with [`GrpcError::ConnectionFailed`] when nothing accepts on `addr`.
pub async fn create_channel_with_config(
  addr: impl Into<String>,
  config: ChannelConfig,
) -> GrpcResult<Channel> {
  let addr_string = addr.into();

  let endpoint = Endpoint::from_shared(addr_string.clone()).map_err(|e| {
    tracing::error!(target: "grpc_client", addr = %addr_string, error = ?e, "Invalid URI");
    GrpcError::InvalidUri(e)
  })?;

  let endpoint = config.apply_to_endpoint(endpoint);

  tracing::debug!(
        target: "grpc_client",
        addr = %addr_string,
        "Creating gRPC channel"
    );

  endpoint.connect().await.map_err(|e| {
    tracing::error!(
            target: "grpc_client",
            addr = %addr_string,
            error = ?e,
            "Failed to connect to gRPC service"
        );
    GrpcError::ConnectionFailed(e)
  })
}
