use crate::{env_or_default, env_parse, ConfigError, FromEnv};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a single request, read and write included.
    pub request_timeout_secs: u64,
    /// Comma-separated origins; `None` leaves CORS off.
    pub cors_allowed_origin: Option<String>,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            ..Self::default()
        }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables with sensible defaults:
    /// - HOST: defaults to 0.0.0.0
    /// - PORT: defaults to 8080
    /// - REQUEST_TIMEOUT_SECS: defaults to 10
    /// - CORS_ALLOWED_ORIGIN: optional
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse("PORT", "8080")?;
        let request_timeout_secs = env_parse("REQUEST_TIMEOUT_SECS", "10")?;
        let cors_allowed_origin = std::env::var("CORS_ALLOWED_ORIGIN")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(Self {
            host,
            port,
            request_timeout_secs,
            cors_allowed_origin,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 8080,
            request_timeout_secs: 10,
            cors_allowed_origin: None,
        }
    }
}
