//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use schoolhub_observability::LogFormat;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `SCHOOLHUB_BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `JWT_SECRET`
    pub jwt_secret: String,
    /// `LOG_FORMAT` (`json` or `text`)
    pub log_format: LogFormat,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; `from_env` with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("SCHOOLHUB_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "SCHOOLHUB_BIND_ADDR",
                message: e.to_string(),
            })?;

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string());
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                message: "must not be empty".to_string(),
            });
        }

        let log_format = match lookup("LOG_FORMAT") {
            None => LogFormat::default(),
            Some(value) => LogFormat::parse(&value).ok_or_else(|| ConfigError::Invalid {
                name: "LOG_FORMAT",
                message: format!("expected 'json' or 'text', got '{value}'"),
            })?,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            log_format,
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}
