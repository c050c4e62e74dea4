//! Todo server
//!
//! ```text
//! HTTP client ─▶ HttpGateway ─(loopback gRPC)─┐
//!                                             ▼
//! gRPC client ──────────────────────▶ RpcListener ─▶ BearerAuth ─▶ TodoServiceImpl
//!                                                                     │
//!                                              TaskService ◀──────────┘
//!                                                   │
//!                                           PgTaskRepository ─▶ PostgreSQL
//! ```
//!
//! Components are started and stopped by [`lifecycle::Lifecycle`].

pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod listener;
pub mod server;
pub mod service;
pub mod storage;

pub use config::{AppConfig, BearerToken};
pub use error::{ServerError, ServerResult};
pub use gateway::HttpGateway;
pub use lifecycle::{Component, ComponentExit, ExitReporter, Hook, Lifecycle, LifecycleState};
pub use listener::RpcListener;
pub use service::TodoServiceImpl;
