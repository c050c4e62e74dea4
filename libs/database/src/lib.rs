//! Database connectors for the todo service.
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL support with SeaORM
//! - `config` (default) - Configuration support with `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use database::common::ProbeSchedule;
//! use database::postgres::{self, PostgresConfig};
//! use core_config::FromEnv;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_when_ready(config, ProbeSchedule::default()).await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
