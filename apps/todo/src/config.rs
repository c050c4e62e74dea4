use std::fmt;
use std::time::Duration;

use core_config::{ConfigError, Environment, FromEnv, env_parse, env_required, server::ServerConfig};
use database::common::ProbeSchedule;
use database::postgres::PostgresConfig;

pub const DEFAULT_GRPC_PORT: u16 = 50051;
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Shared-secret credential every call must present as `Bearer <token>`
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "AUTH_TOKEN".to_string(),
                details: "must not be empty".to_string(),
            });
        }
        Ok(Self(token))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Process configuration, loaded once in `main` and handed to constructors
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: Environment,
    pub grpc: ServerConfig,
    pub http: ServerConfig,
    pub auth_token: BearerToken,
    pub database: PostgresConfig,
    pub probe: ProbeSchedule,
    pub shutdown_timeout: Duration,
}

impl FromEnv for AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = ProbeSchedule::default();
        let probe = ProbeSchedule::new()
            .with_interval(Duration::from_secs(env_parse(
                "DB_PROBE_INTERVAL_SECS",
                defaults.interval.as_secs(),
            )?))
            .with_timeout(Duration::from_secs(env_parse(
                "DB_PROBE_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )?));

        Ok(Self {
            environment: Environment::from_env(),
            grpc: ServerConfig::from_env_prefixed("GRPC", DEFAULT_GRPC_PORT)?,
            http: ServerConfig::from_env_prefixed("HTTP", DEFAULT_HTTP_PORT)?,
            auth_token: BearerToken::new(env_required("AUTH_TOKEN")?)?,
            database: PostgresConfig::from_env()?,
            probe,
            shutdown_timeout: Duration::from_secs(env_parse("SHUTDOWN_TIMEOUT_SECS", 10u64)?),
        })
    }
}
