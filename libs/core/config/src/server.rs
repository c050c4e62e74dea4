use crate::{env_or_default, env_parse, ConfigError};
use std::net::Ipv4Addr;

/// Listener configuration, read from `{PREFIX}_HOST` / `{PREFIX}_PORT`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Load from prefixed variables, e.g. `GRPC_HOST` and `GRPC_PORT` for prefix `GRPC`.
    /// Host defaults to all interfaces.
    pub fn from_env_prefixed(prefix: &str, default_port: u16) -> Result<Self, ConfigError> {
        let host = env_or_default(
            &format!("{prefix}_HOST"),
            &Ipv4Addr::UNSPECIFIED.to_string(),
        );
        let port = env_parse(&format!("{prefix}_PORT"), default_port)?;

        Ok(Self { host, port })
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_defaults() {
        temp_env::with_vars(
            [("GRPC_HOST", None::<&str>), ("GRPC_PORT", None::<&str>)],
            || {
                let config = ServerConfig::from_env_prefixed("GRPC", 50051).unwrap();
                assert_eq!(config.host, "0.0.0.0");
                assert_eq!(config.port, 50051);
                assert_eq!(config.address(), "0.0.0.0:50051");
            },
        );
    }

    #[test]
    fn test_prefixed_custom_values() {
        temp_env::with_vars(
            [("HTTP_HOST", Some("127.0.0.1")), ("HTTP_PORT", Some("3000"))],
            || {
                let config = ServerConfig::from_env_prefixed("HTTP", 8000).unwrap();
                assert_eq!(config, ServerConfig::new("127.0.0.1", 3000));
            },
        );
    }

    #[test]
    fn test_prefixed_port_out_of_range() {
        temp_env::with_var("HTTP_PORT", Some("99999"), || {
            let err = ServerConfig::from_env_prefixed("HTTP", 8000).unwrap_err();
            assert!(err.to_string().contains("HTTP_PORT"));
        });
    }
}
