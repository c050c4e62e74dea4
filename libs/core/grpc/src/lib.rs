//! # gRPC helpers
//!
//! Channel creation with HTTP/2 tuning, the client-side bearer interceptor,
//! and the server-side bearer gate shared by every todo RPC.
//!
//! ## Client
//! ```ignore
//! use grpc_client::{create_channel, AuthInterceptor};
//! use rpc::todo::v1::todo_service_client::TodoServiceClient;
//!
//! let channel = create_channel("http://127.0.0.1:50051").await?;
//! let client = TodoServiceClient::with_interceptor(channel, AuthInterceptor::bearer(token));
//! ```
//!
//! ## Server
//! ```ignore
//! use grpc_client::BearerAuth;
//! use rpc::todo::v1::todo_service_server::TodoServiceServer;
//!
//! let service = TodoServiceServer::with_interceptor(handler, BearerAuth::new(token));
//! ```

pub mod channel;
pub mod error;
pub mod interceptors;

pub use channel::{ChannelConfig, create_channel, create_channel_with_config};
pub use error::{GrpcError, GrpcResult, ToTonicOption};
pub use interceptors::{AuthInterceptor, BearerAuth};
