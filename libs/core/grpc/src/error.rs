use thiserror::Error;

pub type GrpcResult<T> = Result<T, GrpcError>;

/// Errors that can occur during gRPC client creation and configuration
#[derive(Error, Debug)]
pub enum GrpcError {
  /// Invalid URI provided for connection
  #[error("Invalid URI: {0}")]
  InvalidUri(#[from] tonic::transport::Error),

  /// Failed to establish connection
  #[error("Connection failed: {0}")]
  ConnectionFailed(tonic::transport::Error),

  /// A credential could not be encoded as ASCII metadata
  #[error("Invalid metadata value for '{0}'")]
  InvalidMetadata(&'static str),
}

impl From<GrpcError> for tonic::Status {
  fn from(err: GrpcError) -> Self {
    match err {
      GrpcError::InvalidUri(_) => tonic::Status::invalid_argument(err.to_string()),
      GrpcError::InvalidMetadata(_) => tonic::Status::unauthenticated(err.to_string()),
      GrpcError::ConnectionFailed(_) => tonic::Status::unavailable(err.to_string()),
    }
  }
}

/// Extension trait for Option types to convert None to tonic::Status errors
///
/// # Example
/// ```ignore
/// use grpc_client::error::ToTonicOption;
///
/// let task = request.task.ok_or_invalid("task is required")?;
/// ```
pub trait ToTonicOption<T> {
  /// Convert None to a tonic::Status with INVALID_ARGUMENT code
  fn ok_or_invalid(self, message: impl Into<String>) -> Result<T, tonic::Status>;
}

impl<T> ToTonicOption<T> for Option<T> {
  fn ok_or_invalid(self, message: impl Into<String>) -> Result<T, tonic::Status> {
    self.ok_or_else(|| tonic::Status::invalid_argument(message.into()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_option_conversions() {
    let missing: Option<u8> = None;
    assert_eq!(missing.ok_or_invalid("task is required").unwrap_err().code(), tonic::Code::InvalidArgument);
    assert_eq!(Some(7).ok_or_invalid("unused").unwrap(), 7);
  }

  #[test]
  fn test_invalid_metadata_maps_to_unauthenticated() {
    let status: tonic::Status = GrpcError::InvalidMetadata("authorization").into();
    assert_eq!(status.code(), tonic::Code::Unauthenticated);
  }
}
